//! Wire protocol for the traitor card game.
//!
//! This crate defines what lobbies and players say to each other:
//!
//! - **Messages** ([`LobbyMessage`] and its five kinds) — what a lobby
//!   pushes into player outboxes. Each carries a payload or an error.
//! - **Actions** ([`Action`]) — what a seated player can request.
//! - **Error kinds** ([`ErrorKind`], [`MessageError`]) — the shared
//!   failure taxonomy, serializable so clients can branch on it.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how all of the above
//!   become bytes.
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Action / LobbyMessage) → Lobby (seats, games)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Action, ClaimMessage, ErrorKind, HandMessage, LobbyId, LobbyMessage,
    MessageError, Outcome, RevealCardMessage, RoleMessage, StateMessage,
};

// Game types that appear in messages, so transports need only this crate.
pub use traitor_game::{Card, Cards, Phase, Role, Seat};
