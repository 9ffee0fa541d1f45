//! Game engine for the traitor card game.
//!
//! Players are secretly dealt good or bad roles and hands of neutral,
//! good, and bad cards. Each round every player publicly claims a hand
//! (truthfully or not), then the turn passes around the table one play
//! at a time, each play revealing a random card from the chosen player's
//! hand. Revealing every good card wins for good; revealing every bad
//! card, or surviving four rounds, wins for bad.
//!
//! # Key types
//!
//! - [`Game`] — one table's state and its claim/play rules
//! - [`Cards`] / [`Roles`] — category pools with weighted draws
//! - [`composition`] — the fixed role and card totals per table size
//! - [`Phase`] — the derived state of a game
//!
//! The engine knows nothing about lobbies, players' names, or delivery;
//! those live in `traitor-lobby`.

mod cards;
mod composition;
mod error;
mod game;

pub use cards::{Card, Cards, Role, Roles};
pub use composition::{
    Composition, MAX_PLAYERS, MIN_PLAYERS, PlayerCount, composition,
};
pub use error::GameError;
pub use game::{Game, HAND_SIZE, Phase, ROUNDS, Seat};
