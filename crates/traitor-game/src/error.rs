//! Error types for the game engine.

use crate::{MAX_PLAYERS, MIN_PLAYERS, Phase, Seat};

/// Errors returned by [`Game`](crate::Game) operations.
///
/// All of these are ordinary rule violations. The engine rejects the
/// action and leaves its state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A game can only be created for `MIN_PLAYERS..=MAX_PLAYERS` seats.
    #[error(
        "invalid player count {0}, must be {min}-{max}",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    InvalidPlayerCount(usize),

    /// The action is not allowed in the current phase.
    #[error("{seat} tried to {action} during {phase}")]
    WrongPhase {
        seat: Seat,
        action: &'static str,
        phase: Phase,
    },

    /// The game already reached a terminal phase.
    #[error("game is over: {0}")]
    GameOver(Phase),

    /// Only the current seat may play.
    #[error("{seat} tried to play, but the current seat is {current}")]
    WrongTurn { seat: Seat, current: Seat },

    /// The seat index is outside the table.
    #[error("{0} is not seated")]
    UnknownSeat(Seat),

    /// The target seat has no cards left to reveal this round.
    #[error("{0} has no cards left to reveal")]
    EmptyHand(Seat),
}
