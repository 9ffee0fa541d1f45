//! Unified error type for the traitor crates.

use traitor_game::GameError;
use traitor_lobby::LobbyError;
use traitor_protocol::{ErrorKind, ProtocolError};

/// Top-level error that wraps all crate-specific errors.
///
/// `?` converts any sub-crate error into this one.
#[derive(Debug, thiserror::Error)]
pub enum TraitorError {
    /// A rule violation reported by the engine.
    #[error(transparent)]
    Game(#[from] GameError),

    /// An encode or decode failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A lobby or registry failure.
    #[error(transparent)]
    Lobby(#[from] LobbyError),
}

impl TraitorError {
    /// The taxonomy class, if this error has one. Codec failures sit
    /// outside the game's taxonomy.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Game(err) => Some(ErrorKind::from(err)),
            Self::Lobby(err) => Some(err.kind()),
            Self::Protocol(_) => None,
        }
    }
}
