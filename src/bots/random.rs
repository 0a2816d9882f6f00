use rand::Rng;

use crate::action::Action;
use crate::bot::Bot;
use crate::card::Card;

pub const DUMMY_TAKE_PROBABILITY: f64 = 0.5;
pub const LESS_DUMMY_TAKE_PROBABILITY: f64 = 0.125;

/// Baseline bot that takes a card with a fixed probability and ignores everything else.
///
/// It never looks at its own purse, so sooner or later it declines with no tokens
/// left and gets the game thrown out.
pub struct RandomBot<R: Rng> {
    rng: R,
    take_probability: f64,
    identifier: String,
}

impl<R: Rng> RandomBot<R> {
    /// `take_probability` is clamped to `[0, 1]`.
    pub fn new(rng: R, take_probability: f64, identifier: impl Into<String>) -> Self {
        Self {
            rng,
            take_probability: take_probability.clamp(0.0, 1.0),
            identifier: identifier.into(),
        }
    }

    /// Coin flip on every offer.
    pub fn dummy(rng: R) -> Self {
        Self::new(rng, DUMMY_TAKE_PROBABILITY, "dummy")
    }

    /// Takes one offer in eight.
    pub fn less_dummy(rng: R) -> Self {
        Self::new(rng, LESS_DUMMY_TAKE_PROBABILITY, "lessdummy")
    }

    pub fn take_probability(&self) -> f64 {
        self.take_probability
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn decide(&mut self, _card: Card, _tokens_on_offer: u32) -> Action {
        self.rng.gen_bool(self.take_probability).into()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn extreme_probabilities_are_deterministic() {
        let mut never = RandomBot::new(StdRng::seed_from_u64(1), 0.0, "never");
        let mut always = RandomBot::new(StdRng::seed_from_u64(1), 1.0, "always");
        for value in 3..=35 {
            assert_eq!(never.decide(Card::new(value), 4), Action::NoThanks);
            assert_eq!(always.decide(Card::new(value), 0), Action::Take);
        }
    }

    #[test]
    fn presets_and_clamping() {
        let rng = StdRng::seed_from_u64(2);
        assert_eq!(RandomBot::less_dummy(rng.clone()).take_probability(), 0.125);
        assert_eq!(RandomBot::dummy(rng.clone()).identifier(), "dummy");
        assert_eq!(RandomBot::new(rng, 3.0, "x").take_probability(), 1.0);
    }
}
