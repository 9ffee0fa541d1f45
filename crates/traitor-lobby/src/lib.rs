//! Lobbies for the traitor card game.
//!
//! Each lobby runs as an isolated Tokio task (actor model) that owns its
//! roster and, once started, its game. A [`LobbyRegistry`] maps lobby ids
//! to running actors and routes every operation to the right one.
//!
//! # Key types
//!
//! - [`LobbyRegistry`] — creates/closes lobbies, routes requests
//! - [`LobbyHandle`] — send commands to a running lobby actor
//! - [`LobbyConfig`] — queue sizes, slow-receiver policy, game seed
//! - [`DeliveryReport`] — who did and didn't receive a message
//! - [`outbox`] — create a bounded per-seat message channel

mod config;
mod error;
mod lobby;
mod outbox;
mod player;
mod registry;

pub use config::{LobbyConfig, LobbyStatus, SlowReceiverPolicy};
pub use error::{DeliveryError, LobbyError};
pub use lobby::{LobbyHandle, LobbyInfo, PlayerInfo};
pub use outbox::{DeliveryReport, PlayerReceiver, PlayerSender, outbox};
pub use player::Seating;
pub use registry::LobbyRegistry;
