//! Fixed per-table-size composition of roles and cards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Cards, GameError, Roles};

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 3;

/// Largest supported table.
pub const MAX_PLAYERS: usize = 10;

/// A validated player count in `MIN_PLAYERS..=MAX_PLAYERS`.
///
/// Holding a `PlayerCount` proves the count is in range, which keeps the
/// composition lookup total; there is no "unknown table size" branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PlayerCount(u8);

impl PlayerCount {
    /// The count as a plain number.
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<usize> for PlayerCount {
    type Error = GameError;

    fn try_from(players: usize) -> Result<Self, Self::Error> {
        if (MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            // In range, so it fits in a u8.
            Ok(Self(players as u8))
        } else {
            Err(GameError::InvalidPlayerCount(players))
        }
    }
}

impl From<PlayerCount> for usize {
    fn from(count: PlayerCount) -> Self {
        count.get()
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The complete universe of roles and cards for one table size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub roles: Roles,
    pub cards: Cards,
}

const fn row(good: u8, bad: u8, cards: (u8, u8, u8)) -> Composition {
    Composition {
        roles: Roles::new(good, bad),
        cards: Cards::new(cards.0, cards.1, cards.2),
    }
}

/// Indexed by `players - MIN_PLAYERS`.
const TABLE: [Composition; MAX_PLAYERS - MIN_PLAYERS + 1] = [
    row(2, 2, (8, 5, 2)),   // 3
    row(3, 2, (12, 6, 2)),  // 4
    row(3, 2, (16, 7, 2)),  // 5
    row(4, 2, (20, 8, 2)),  // 6
    row(5, 3, (26, 7, 2)),  // 7
    row(6, 3, (30, 8, 2)),  // 8
    row(6, 3, (34, 9, 2)),  // 9
    row(7, 4, (37, 10, 3)), // 10
];

/// Looks up the role and card totals for a table size.
pub fn composition(players: PlayerCount) -> Composition {
    TABLE[players.get() - MIN_PLAYERS]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(n: usize) -> PlayerCount {
        PlayerCount::try_from(n).unwrap()
    }

    #[test]
    fn test_player_count_rejects_out_of_range() {
        for n in [0, 1, 2, 11, 100] {
            assert!(
                matches!(
                    PlayerCount::try_from(n),
                    Err(GameError::InvalidPlayerCount(got)) if got == n
                ),
                "{n} should be rejected"
            );
        }
    }

    #[test]
    fn test_player_count_accepts_full_range() {
        for n in MIN_PLAYERS..=MAX_PLAYERS {
            assert_eq!(count(n).get(), n);
        }
    }

    #[test]
    fn test_composition_table_literal_values() {
        let expected = [
            (3, (2, 2), (8, 5, 2)),
            (4, (3, 2), (12, 6, 2)),
            (5, (3, 2), (16, 7, 2)),
            (6, (4, 2), (20, 8, 2)),
            (7, (5, 3), (26, 7, 2)),
            (8, (6, 3), (30, 8, 2)),
            (9, (6, 3), (34, 9, 2)),
            (10, (7, 4), (37, 10, 3)),
        ];
        for (n, (good, bad), (neutral, g, b)) in expected {
            let c = composition(count(n));
            assert_eq!(c.roles, Roles::new(good, bad), "roles for {n}");
            assert_eq!(c.cards, Cards::new(neutral, g, b), "cards for {n}");
        }
    }

    #[test]
    fn test_every_table_holds_five_cards_per_player() {
        // Hands shrink 5, 4, 3, 2, 1 and the deck must cover all of them.
        for n in MIN_PLAYERS..=MAX_PLAYERS {
            assert_eq!(usize::from(composition(count(n)).cards.sum()), 5 * n);
        }
    }

    #[test]
    fn test_player_count_deserialize_validates() {
        let ok: PlayerCount = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<PlayerCount>("11").is_err());
    }
}
