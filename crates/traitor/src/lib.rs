//! # Traitor
//!
//! A hidden-role card game for 3 to 10 players, plus the lobby layer
//! that hosts many tables at once.
//!
//! The engine ([`traitor_game`]) is pure and synchronous. Lobbies
//! ([`traitor_lobby`]) run one Tokio task each and push
//! [`LobbyMessage`](prelude::LobbyMessage)s to bounded per-seat outboxes.
//! A transport only has to create lobbies, register an outbox per
//! connection, and forward decoded [`Action`](prelude::Action)s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use traitor::prelude::*;
//!
//! # async fn run() -> Result<(), TraitorError> {
//! let registry = LobbyRegistry::default();
//! let host = registry.create_lobby("ann").await?;
//! registry.join(host.lobby_id, "bo").await?;
//! registry.join(host.lobby_id, "cy").await?;
//!
//! let mut rx = registry.connect(host.lobby_id, host.seat).await?;
//! registry.start(host.lobby_id).await?;
//!
//! while let Some(msg) = rx.recv().await {
//!     let bytes = JsonCodec.encode(&*msg)?;
//!     println!("{}", String::from_utf8_lossy(&bytes));
//! #   break;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod telemetry;

pub use error::TraitorError;
pub use traitor_game as game;
pub use traitor_lobby as lobby;
pub use traitor_protocol as protocol;

pub mod prelude {
    pub use crate::TraitorError;
    pub use traitor_game::{Card, Cards, Game, GameError, Phase, Role, Seat};
    pub use traitor_lobby::{
        DeliveryError, DeliveryReport, LobbyConfig, LobbyError, LobbyInfo,
        LobbyRegistry, LobbyStatus, PlayerReceiver, PlayerSender, Seating,
        SlowReceiverPolicy, outbox,
    };
    pub use traitor_protocol::{
        Action, Codec, ErrorKind, JsonCodec, LobbyId, LobbyMessage,
        MessageError,
    };
}
