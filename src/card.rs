use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Face value of a No Thanks! card. Doubles as its penalty in points.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Card(u8);

pub const MIN_CARD_VALUE: u8 = 3;
pub const MAX_CARD_VALUE: u8 = 35;
pub const DECK_SIZE: usize = 23;
pub const INITIAL_TOKENS: u32 = 11;
pub const MIN_PLAYERS: usize = 2;

impl Card {
    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// True when `self` directly follows `previous` in a run.
    #[inline]
    pub fn follows(self, previous: Card) -> bool {
        previous.0.checked_add(1) == Some(self.0)
    }
}

impl From<u8> for Card {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every card of the range `[low, high]` in ascending order.
pub fn full_range(low: u8, high: u8) -> Vec<Card> {
    (low..=high).map(Card).collect()
}

/// Draws `count` distinct cards from `[low, high]` and shuffles them.
///
/// The only failure is a range that cannot supply `count` cards, which is a
/// configuration problem rather than something a running game can hit.
pub fn build_deck<R: Rng + ?Sized>(
    rng: &mut R,
    low: u8,
    high: u8,
    count: usize,
) -> Result<Vec<Card>, GameError> {
    if low > high {
        return Err(GameError::InvalidConfiguration(
            "lowest card must not exceed highest card",
        ));
    }
    let range = usize::from(high - low) + 1;
    if count > range {
        return Err(GameError::InvalidConfiguration(
            "deck size exceeds the number of distinct cards",
        ));
    }
    let mut deck: Vec<Card> = sample(rng, range, count)
        .into_iter()
        .map(|offset| Card(low + offset as u8))
        .collect();
    deck.shuffle(rng);
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn reference_deck_has_23_unique_cards_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = build_deck(&mut rng, MIN_CARD_VALUE, MAX_CARD_VALUE, DECK_SIZE).unwrap();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<Card> = deck.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
        assert!(deck.iter().all(|c| (3..=35).contains(&c.value())));
    }

    #[test]
    fn same_seed_gives_same_deck() {
        let a = build_deck(&mut StdRng::seed_from_u64(99), 3, 35, 23).unwrap();
        let b = build_deck(&mut StdRng::seed_from_u64(99), 3, 35, 23).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn whole_range_deck_is_a_permutation() {
        let mut deck = build_deck(&mut StdRng::seed_from_u64(1), 3, 35, 33).unwrap();
        deck.sort();
        assert_eq!(deck, full_range(3, 35));
    }

    #[test]
    fn oversized_deck_is_a_configuration_error() {
        let err = build_deck(&mut StdRng::seed_from_u64(1), 3, 35, 34).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration(_)));
    }

    #[test]
    fn follows_detects_runs() {
        assert!(Card::new(6).follows(Card::new(5)));
        assert!(!Card::new(7).follows(Card::new(5)));
        assert!(!Card::new(5).follows(Card::new(5)));
    }
}
