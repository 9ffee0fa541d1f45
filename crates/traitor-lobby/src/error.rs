//! Error types for the lobby layer.

use traitor_game::{GameError, MAX_PLAYERS, MIN_PLAYERS, Seat};
use traitor_protocol::{ErrorKind, LobbyId, MessageError};

/// Errors that can occur during lobby operations.
///
/// Join, Start, and the roster operations return these directly. Game
/// actions (claim, play, queries) instead fold them into the message
/// they broadcast; only a failed lookup comes back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The lobby does not exist (never created, or already closed).
    #[error("lobby {0} not found")]
    NotFound(LobbyId),

    /// Every seat is taken.
    #[error("lobby {0} is full")]
    LobbyFull(LobbyId),

    /// Another seated player already uses this name.
    #[error("name {0:?} is already taken")]
    NameTaken(String),

    /// Names must contain something other than whitespace.
    #[error("player name must not be blank")]
    BlankName,

    /// The roster size is outside the playable range.
    #[error(
        "cannot start with {0} players, need {min}-{max}",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    InvalidPlayerCount(usize),

    /// The lobby already has a game.
    #[error("lobby {0} has already started")]
    AlreadyStarted(LobbyId),

    /// The lobby has no game yet.
    #[error("lobby {0} has not started")]
    NotStarted(LobbyId),

    /// No player sits at this seat.
    #[error("{1} is not seated in lobby {0}")]
    NotSeated(LobbyId, Seat),

    /// The game engine rejected the action.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A message could not be handed to a seat.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The lobby's actor has stopped or its command queue is closed.
    #[error("lobby {0} is unavailable")]
    Unavailable(LobbyId),
}

impl LobbyError {
    /// Where this error falls in the shared failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LobbyFull(_)
            | Self::NameTaken(_)
            | Self::BlankName
            | Self::InvalidPlayerCount(_) => ErrorKind::Validation,
            Self::AlreadyStarted(_) | Self::NotStarted(_) => ErrorKind::Phase,
            Self::NotFound(_) | Self::NotSeated(..) | Self::Unavailable(_) => {
                ErrorKind::Lookup
            }
            Self::Game(err) => ErrorKind::from(err),
            Self::Delivery(_) => ErrorKind::Delivery,
        }
    }
}

impl From<&LobbyError> for MessageError {
    fn from(err: &LobbyError) -> Self {
        MessageError::new(err.kind(), err.to_string())
    }
}

impl From<LobbyError> for MessageError {
    fn from(err: LobbyError) -> Self {
        MessageError::from(&err)
    }
}

/// Why a message did not reach a seat.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The seat has never registered a channel, or unregistered it.
    #[error("{0} has no channel attached")]
    NoChannel(Seat),

    /// The seat's outbox is at capacity.
    #[error("outbox of {0} is full")]
    OutboxFull(Seat),

    /// The receiving half was dropped; the channel is now detached.
    #[error("receiver of {0} is gone")]
    Closed(Seat),
}

impl DeliveryError {
    /// The seat the message was meant for.
    pub fn seat(&self) -> Seat {
        match self {
            Self::NoChannel(seat) | Self::OutboxFull(seat) | Self::Closed(seat) => *seat,
        }
    }
}

#[cfg(test)]
mod tests {
    use traitor_game::Phase;

    use super::*;

    #[test]
    fn test_kind_covers_taxonomy() {
        let id = LobbyId(1);
        assert_eq!(LobbyError::LobbyFull(id).kind(), ErrorKind::Validation);
        assert_eq!(
            LobbyError::NameTaken("ann".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            LobbyError::InvalidPlayerCount(2).kind(),
            ErrorKind::Validation
        );
        assert_eq!(LobbyError::NotStarted(id).kind(), ErrorKind::Phase);
        assert_eq!(LobbyError::AlreadyStarted(id).kind(), ErrorKind::Phase);
        assert_eq!(LobbyError::NotFound(id).kind(), ErrorKind::Lookup);
        assert_eq!(
            LobbyError::NotSeated(id, Seat(4)).kind(),
            ErrorKind::Lookup
        );
        assert_eq!(
            LobbyError::from(DeliveryError::NoChannel(Seat(0))).kind(),
            ErrorKind::Delivery
        );
    }

    #[test]
    fn test_game_errors_keep_their_kind() {
        let err = LobbyError::from(GameError::GameOver(Phase::WinGood));
        assert_eq!(err.kind(), ErrorKind::Phase);
        let err = LobbyError::from(GameError::WrongTurn {
            seat: Seat(1),
            current: Seat(0),
        });
        assert_eq!(err.kind(), ErrorKind::Turn);
    }

    #[test]
    fn test_message_error_from_lobby_error() {
        let msg = MessageError::from(LobbyError::NotStarted(LobbyId(9)));
        assert_eq!(msg.kind, ErrorKind::Phase);
        assert_eq!(msg.reason, "lobby L-9 has not started");
    }

    #[test]
    fn test_invalid_player_count_message_names_range() {
        let err = LobbyError::InvalidPlayerCount(2);
        assert_eq!(err.to_string(), "cannot start with 2 players, need 3-10");
    }

    #[test]
    fn test_delivery_error_seat() {
        assert_eq!(DeliveryError::Closed(Seat(3)).seat(), Seat(3));
    }
}
