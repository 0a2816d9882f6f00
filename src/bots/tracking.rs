use rand::Rng;

use crate::action::Action;
use crate::bot::Bot;
use crate::card::{Card, INITIAL_TOKENS};

const GAMBLE_TAKE_PROBABILITY: f64 = 0.25;

/// Rule-based bot that keeps its own copy of its purse and collection.
///
/// In plain English:
/// - Out of tokens: take whatever comes, declining would be cheating.
/// - Nothing on the card yet: let someone else pay for it first.
/// - The card sits right below one already owned: it joins a run for free, take it.
/// - More tokens than half the face value: good deal, take it.
/// - Otherwise take it one time in four.
pub struct TrackingBot<R: Rng> {
    rng: R,
    tokens: u32,
    cards: Vec<Card>,
    revealed: Vec<Card>,
}

impl<R: Rng> TrackingBot<R> {
    pub fn new(rng: R) -> Self {
        Self::with_tokens(rng, INITIAL_TOKENS)
    }

    /// Starting purse for games played with non-standard rules.
    pub fn with_tokens(rng: R, tokens: u32) -> Self {
        Self {
            rng,
            tokens,
            cards: Vec::new(),
            revealed: Vec::new(),
        }
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Every card announced so far, in reveal order.
    pub fn revealed(&self) -> &[Card] {
        &self.revealed
    }

    fn completes_run(&self, card: Card) -> bool {
        self.cards.iter().any(|owned| owned.follows(card))
    }
}

impl<R: Rng> Bot for TrackingBot<R> {
    fn identifier(&self) -> &str {
        "tracking"
    }

    fn notify_new_card(&mut self, card: Card) {
        self.revealed.push(card);
    }

    fn decide(&mut self, card: Card, tokens_on_offer: u32) -> Action {
        let take = if self.tokens == 0 {
            true
        } else if tokens_on_offer == 0 {
            false
        } else if self.completes_run(card) {
            true
        } else if 2 * tokens_on_offer > u32::from(card.value()) {
            true
        } else {
            self.rng.gen_bool(GAMBLE_TAKE_PROBABILITY)
        };

        if take {
            self.cards.push(card);
            self.tokens += tokens_on_offer;
        } else {
            self.tokens -= 1;
        }
        take.into()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn bot() -> TrackingBot<StdRng> {
        TrackingBot::new(StdRng::seed_from_u64(3))
    }

    #[test]
    fn declines_an_empty_pool() {
        let mut bot = bot();
        assert_eq!(bot.decide(Card::new(3), 0), Action::NoThanks);
        assert_eq!(bot.tokens(), 10);
    }

    #[test]
    fn takes_when_broke() {
        let mut bot = TrackingBot::with_tokens(StdRng::seed_from_u64(3), 0);
        assert_eq!(bot.decide(Card::new(35), 0), Action::Take);
        assert_eq!(bot.cards(), &[Card::new(35)]);
    }

    #[test]
    fn takes_a_card_that_extends_a_run_downwards() {
        let mut bot = TrackingBot::with_tokens(StdRng::seed_from_u64(3), 0);
        bot.decide(Card::new(21), 0);
        bot.tokens = 5;
        assert_eq!(bot.decide(Card::new(20), 1), Action::Take);
        assert_eq!(bot.tokens(), 6);
    }

    #[test]
    fn takes_a_generous_offer() {
        let mut bot = bot();
        assert_eq!(bot.decide(Card::new(9), 5), Action::Take);
        assert_eq!(bot.tokens(), 16);
    }

    #[test]
    fn remembers_revealed_cards() {
        let mut bot = bot();
        bot.notify_new_card(Card::new(8));
        bot.notify_new_card(Card::new(30));
        assert_eq!(bot.revealed(), &[Card::new(8), Card::new(30)]);
    }
}
