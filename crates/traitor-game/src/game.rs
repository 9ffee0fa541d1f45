//! The game engine: one table's roles, hands, claims, and reveals.
//!
//! The engine is a plain synchronous state machine. It does no locking
//! and no I/O; the lobby layer owns it and serializes every call.
//!
//! # Round structure
//!
//! ```text
//!   Claiming ──(every seat claimed)──→ Playing ──(n plays)──→ Claiming …
//!       │                                 │
//!       └────────── all good / all bad revealed, or 4 rounds ──→ WinGood | WinBad
//! ```
//!
//! The phase is never stored. [`Game::phase`] derives it from the revealed
//! tally and the claims every time it is asked, so it cannot drift from
//! the state it describes.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{Card, Cards, GameError, PlayerCount, Role, composition};

/// Cards per hand in the first round. Each later round deals one fewer.
pub const HAND_SIZE: u8 = 5;

/// Completing this many rounds without a card win ends the game for bad.
pub const ROUNDS: u8 = 4;

/// A seat at the table, assigned in join order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Seat(pub u8);

impl Seat {
    /// The seat as a vector index.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// The derived phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// At least one seat has not claimed its hand this round.
    Claiming,
    /// Every seat has claimed; cards are being revealed.
    Playing,
    /// Every good card was revealed.
    WinGood,
    /// Every bad card was revealed, or the rounds ran out.
    WinBad,
}

impl Phase {
    /// Returns `true` once the game has a winner.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::WinGood | Self::WinBad)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claiming => write!(f, "Claiming"),
            Self::Playing => write!(f, "Playing"),
            Self::WinGood => write!(f, "WinGood"),
            Self::WinBad => write!(f, "WinBad"),
        }
    }
}

/// One game's mutable state.
///
/// Invariant: `revealed + Σ hands == composition(players).cards` after
/// every successful operation.
#[derive(Debug, Clone)]
pub struct Game {
    players: PlayerCount,
    current: Seat,
    revealed: Cards,
    hands: Vec<Cards>,
    roles: Vec<Role>,
    claims: Vec<Option<Cards>>,
    rng: StdRng,
}

impl Game {
    /// Creates a game for `players` seats, seeded from the OS.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidPlayerCount`] outside 3..=10.
    pub fn new(players: usize) -> Result<Self, GameError> {
        Self::with_rng(players, StdRng::from_os_rng())
    }

    /// Creates a game whose every draw is reproducible from `seed`.
    pub fn with_seed(players: usize, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(players, StdRng::seed_from_u64(seed))
    }

    fn with_rng(players: usize, mut rng: StdRng) -> Result<Self, GameError> {
        let players = PlayerCount::try_from(players)?;
        let n = players.get();

        // Roles are drawn first, one per seat in seat order, then the
        // first hands. Replays depend on this order.
        let mut role_deck = composition(players).roles;
        let roles = (0..n).map(|_| role_deck.draw(&mut rng)).collect();

        let mut game = Self {
            players,
            current: Seat(0),
            revealed: Cards::default(),
            hands: vec![Cards::default(); n],
            roles,
            claims: vec![None; n],
            rng,
        };
        game.deal();
        Ok(game)
    }

    // -- Queries --

    pub fn player_count(&self) -> PlayerCount {
        self.players
    }

    /// The seat whose turn it is to play.
    pub fn current_seat(&self) -> Seat {
        self.current
    }

    /// Every card revealed so far.
    pub fn revealed(&self) -> Cards {
        self.revealed
    }

    pub fn hand(&self, seat: Seat) -> Result<Cards, GameError> {
        self.check_seat(seat)?;
        Ok(self.hands[seat.index()])
    }

    pub fn role(&self, seat: Seat) -> Result<Role, GameError> {
        self.check_seat(seat)?;
        Ok(self.roles[seat.index()])
    }

    pub fn hands(&self) -> &[Cards] {
        &self.hands
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// This round's claims; `None` for seats that haven't claimed yet.
    pub fn claims(&self) -> &[Option<Cards>] {
        &self.claims
    }

    /// Completed rounds.
    pub fn round(&self) -> u8 {
        self.revealed.sum() / self.players.get() as u8
    }

    /// Plays made in the current round.
    pub fn cards_played_in_round(&self) -> u8 {
        self.revealed.sum() % self.players.get() as u8
    }

    /// Derives the current phase.
    pub fn phase(&self) -> Phase {
        let deck = composition(self.players).cards;
        if self.revealed.bad == deck.bad {
            return Phase::WinBad;
        }
        if self.revealed.good == deck.good {
            return Phase::WinGood;
        }
        if self.round() >= ROUNDS {
            return Phase::WinBad;
        }
        if self.claims.iter().any(Option::is_none) {
            return Phase::Claiming;
        }
        Phase::Playing
    }

    // -- Actions --

    /// Records what `seat` says it holds. The claim is never checked
    /// against the real hand.
    ///
    /// # Errors
    /// - [`GameError::UnknownSeat`] — seat outside the table
    /// - [`GameError::GameOver`] — a winner is already decided
    /// - [`GameError::WrongPhase`] — not in [`Phase::Claiming`]
    pub fn claim(&mut self, seat: Seat, cards: Cards) -> Result<(), GameError> {
        self.check_seat(seat)?;
        match self.phase() {
            Phase::Claiming => {}
            phase if phase.is_terminal() => {
                return Err(GameError::GameOver(phase));
            }
            phase => {
                return Err(GameError::WrongPhase {
                    seat,
                    action: "claim",
                    phase,
                });
            }
        }
        self.claims[seat.index()] = Some(cards);
        Ok(())
    }

    /// `from` passes the turn to `to`, and one random card from `to`'s
    /// hand is revealed. Returns the revealed card.
    ///
    /// When the play completes a round, all claims are cleared and every
    /// hand is redealt one card smaller.
    ///
    /// # Errors
    /// - [`GameError::UnknownSeat`] — either seat outside the table
    /// - [`GameError::GameOver`] — a winner is already decided
    /// - [`GameError::WrongPhase`] — not in [`Phase::Playing`]
    /// - [`GameError::WrongTurn`] — `from` is not the current seat
    /// - [`GameError::EmptyHand`] — `to` has nothing left to reveal
    pub fn play(&mut self, from: Seat, to: Seat) -> Result<Card, GameError> {
        self.check_seat(from)?;
        self.check_seat(to)?;
        match self.phase() {
            Phase::Playing => {}
            phase if phase.is_terminal() => {
                return Err(GameError::GameOver(phase));
            }
            phase => {
                return Err(GameError::WrongPhase {
                    seat: from,
                    action: "play",
                    phase,
                });
            }
        }
        if from != self.current {
            return Err(GameError::WrongTurn {
                seat: from,
                current: self.current,
            });
        }
        if self.hands[to.index()].is_empty() {
            return Err(GameError::EmptyHand(to));
        }

        self.current = to;
        let card = self.hands[to.index()].draw(&mut self.rng);
        self.revealed.add(card);

        if self.cards_played_in_round() == 0 {
            self.claims.fill(None);
            self.deal();
            tracing::info!(
                round = self.round(),
                revealed = %self.revealed,
                "round complete, hands redealt"
            );
        }
        Ok(card)
    }

    /// Refills every hand from whatever hasn't been revealed yet.
    fn deal(&mut self) {
        let mut deck = composition(self.players)
            .cards
            .saturating_sub(&self.revealed);
        let hand_size = HAND_SIZE.saturating_sub(self.round());
        for hand in &mut self.hands {
            *hand = Cards::default();
            for _ in 0..hand_size {
                hand.add(deck.draw(&mut self.rng));
            }
        }
    }

    fn check_seat(&self, seat: Seat) -> Result<(), GameError> {
        if seat.index() < self.players.get() {
            Ok(())
        } else {
            Err(GameError::UnknownSeat(seat))
        }
    }
}
