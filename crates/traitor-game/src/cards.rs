//! Card and role pools, and the weighted sampler that draws from them.
//!
//! Every pool in the game (the role deck, the shared card deck, each
//! player's hand) is just a handful of per-category counts. Drawing
//! picks a category with probability proportional to its remaining count
//! and decrements it, so repeated draws sample *without replacement*.
//!
//! ```text
//! pool:  neutral=3  good=2  bad=1        (total 6)
//! pick:  0 1 2 | 3 4 | 5                 uniform in [0, 6)
//!        ──────  ───   ─
//!        neutral good  bad
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sampler
// ---------------------------------------------------------------------------

/// Draws one item from a pool of category counts, in category order.
///
/// A uniform integer in `[0, total)` is compared against the running sum
/// of the counts; the first category whose cumulative count exceeds it
/// wins. The last category is the fallthrough, so only the first
/// `len - 1` comparisons are ever made.
///
/// # Panics
/// Panics if the pool is empty. Callers draw exactly as many times as
/// the pool holds, so an empty draw is a bug in the caller.
pub(crate) fn draw_index<R: Rng + ?Sized>(
    counts: &mut [u8],
    rng: &mut R,
) -> usize {
    let total: u32 = counts.iter().map(|&c| u32::from(c)).sum();
    assert!(total > 0, "draw from an empty pool");

    let mut pick = rng.random_range(0..total);
    let last = counts.len() - 1;
    let mut index = last;
    for (i, &count) in counts[..last].iter().enumerate() {
        let count = u32::from(count);
        if pick < count {
            index = i;
            break;
        }
        pick -= count;
    }
    counts[index] -= 1;
    index
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// The category of a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    Neutral,
    Good,
    Bad,
}

impl Card {
    /// All categories in sampling order.
    pub const ALL: [Card; 3] = [Card::Neutral, Card::Good, Card::Bad];
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Good => write!(f, "good"),
            Self::Bad => write!(f, "bad"),
        }
    }
}

/// A multiset of cards: how many of each category.
///
/// Used for the whole deck, for hands, for the cumulative revealed
/// tally, and for claims (which are just a player's say-so).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Cards {
    pub neutral: u8,
    pub good: u8,
    pub bad: u8,
}

impl Cards {
    /// Creates a pool with the given counts.
    pub const fn new(neutral: u8, good: u8, bad: u8) -> Self {
        Self { neutral, good, bad }
    }

    /// Total number of cards in the pool, saturating at `u8::MAX`.
    ///
    /// Claims come straight from clients and can hold any counts.
    pub fn sum(&self) -> u8 {
        self.neutral.saturating_add(self.good).saturating_add(self.bad)
    }

    /// Returns `true` if no cards are left.
    pub fn is_empty(&self) -> bool {
        self.sum() == 0
    }

    /// Count of one category.
    pub fn count(&self, card: Card) -> u8 {
        match card {
            Card::Neutral => self.neutral,
            Card::Good => self.good,
            Card::Bad => self.bad,
        }
    }

    /// Adds one card of the given category, saturating at `u8::MAX`.
    pub fn add(&mut self, card: Card) {
        let count = match card {
            Card::Neutral => &mut self.neutral,
            Card::Good => &mut self.good,
            Card::Bad => &mut self.bad,
        };
        *count = count.saturating_add(1);
    }

    /// Per-category sum of two pools, saturating at `u8::MAX`.
    pub fn plus(&self, other: &Cards) -> Cards {
        Cards::new(
            self.neutral.saturating_add(other.neutral),
            self.good.saturating_add(other.good),
            self.bad.saturating_add(other.bad),
        )
    }

    /// Per-category difference, clamped at zero.
    pub fn saturating_sub(&self, other: &Cards) -> Cards {
        Cards::new(
            self.neutral.saturating_sub(other.neutral),
            self.good.saturating_sub(other.good),
            self.bad.saturating_sub(other.bad),
        )
    }

    /// Draws one card, weighted by the remaining counts, and removes it.
    ///
    /// # Panics
    /// Panics if the pool is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Card {
        let mut counts = [self.neutral, self.good, self.bad];
        let card = Card::ALL[draw_index(&mut counts, rng)];
        [self.neutral, self.good, self.bad] = counts;
        card
    }
}

impl fmt::Display for Cards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} neutral / {} good / {} bad",
            self.neutral, self.good, self.bad
        )
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// A player's secret allegiance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Good,
    Bad,
}

impl Role {
    /// All roles in sampling order.
    pub const ALL: [Role; 2] = [Role::Good, Role::Bad];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Bad => write!(f, "bad"),
        }
    }
}

/// The role deck: how many good and bad roles are left to hand out.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Roles {
    pub good: u8,
    pub bad: u8,
}

impl Roles {
    pub const fn new(good: u8, bad: u8) -> Self {
        Self { good, bad }
    }

    pub fn sum(&self) -> u8 {
        self.good.saturating_add(self.bad)
    }

    /// Draws one role, weighted by the remaining counts, and removes it.
    ///
    /// # Panics
    /// Panics if the deck is empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Role {
        let mut counts = [self.good, self.bad];
        let role = Role::ALL[draw_index(&mut counts, rng)];
        [self.good, self.bad] = counts;
        role
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::{PlayerCount, composition};

    fn all_counts() -> impl Iterator<Item = PlayerCount> {
        (3..=10).map(|n| PlayerCount::try_from(n).unwrap())
    }

    #[test]
    fn test_draw_index_single_category_always_picked() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut counts = [0, 4, 0];
        for _ in 0..4 {
            assert_eq!(draw_index(&mut counts, &mut rng), 1);
        }
        assert_eq!(counts, [0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "empty pool")]
    fn test_draw_from_empty_pool_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        Cards::default().draw(&mut rng);
    }

    #[test]
    fn test_role_deck_exhaustive_draw_matches_table() {
        let mut rng = StdRng::seed_from_u64(7);
        for players in all_counts() {
            let table = composition(players).roles;
            // Some tables carry spare roles; every seat still gets one.
            assert!(usize::from(table.sum()) >= players.get());

            let mut deck = table;
            let mut drawn = Roles::default();
            while deck.sum() > 0 {
                match deck.draw(&mut rng) {
                    Role::Good => drawn.good += 1,
                    Role::Bad => drawn.bad += 1,
                }
            }
            assert_eq!(drawn, table, "{players} players");
        }
    }

    #[test]
    fn test_card_deck_exhaustive_draw_matches_table() {
        let mut rng = StdRng::seed_from_u64(11);
        for players in all_counts() {
            let table = composition(players).cards;
            let mut deck = table;
            let mut drawn = Cards::default();
            while !deck.is_empty() {
                drawn.add(deck.draw(&mut rng));
            }
            assert_eq!(drawn, table, "{players} players");
        }
    }

    #[test]
    fn test_draw_never_picks_exhausted_category() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let mut hand = Cards::new(2, 0, 1);
            let card = hand.draw(&mut rng);
            assert_ne!(card, Card::Good);
        }
    }

    #[test]
    fn test_oversized_claim_counts_saturate() {
        let claim = Cards::new(200, 100, 0);
        assert_eq!(claim.sum(), u8::MAX);
        assert_eq!(claim.plus(&claim), Cards::new(u8::MAX, 200, 0));

        let mut full = Cards::new(u8::MAX, 0, 0);
        full.add(Card::Neutral);
        assert_eq!(full.neutral, u8::MAX);
    }

    #[test]
    fn test_saturating_sub_and_plus() {
        let deck = Cards::new(12, 6, 2);
        let revealed = Cards::new(3, 1, 0);
        let remaining = deck.saturating_sub(&revealed);
        assert_eq!(remaining, Cards::new(9, 5, 2));
        assert_eq!(remaining.plus(&revealed), deck);
        assert_eq!(revealed.saturating_sub(&deck), Cards::default());
    }

    #[test]
    fn test_cards_serialize_as_named_counts() {
        let json = serde_json::to_value(Cards::new(1, 2, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"neutral": 1, "good": 2, "bad": 3}));
    }
}
