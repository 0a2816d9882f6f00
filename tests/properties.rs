//! Property-based tests for the rule engine invariants.

mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use common::assert_tokens_conserved;
use nothanks::{
    Bot, Card, GameBuilder, GameError, NullObserver, Progress, RandomBot, TrackingBot, TurnPhase,
    build_deck, count_score,
};

fn roster(probabilities: &[f64], seed: u64) -> Vec<Box<dyn Bot>> {
    probabilities
        .iter()
        .enumerate()
        .map(|(idx, &p)| -> Box<dyn Bot> {
            let rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64));
            if p > 0.9 {
                Box::new(TrackingBot::new(rng))
            } else {
                Box::new(RandomBot::new(rng, p, format!("random{idx}")))
            }
        })
        .collect()
}

proptest! {
    /// Property: tokens are neither created nor destroyed, every game stops,
    /// and the turn only moves when somebody declines.
    #[test]
    fn prop_game_invariants(
        probabilities in prop::collection::vec(0.0f64..1.0, 2..6),
        seed in any::<u64>(),
    ) {
        let mut game = GameBuilder::new(roster(&probabilities, seed))
            .and_then(|b| b.with_seed(seed).with_observer(NullObserver).build())
            .expect("valid setup");
        let total = game.settings().total_tokens();
        let bound = game.settings().deck_size * (total as usize + 2) + 1;
        let players = probabilities.len();

        let mut steps = 0usize;
        loop {
            prop_assert!(steps <= bound, "game did not terminate after {steps} steps");
            steps += 1;

            let before = game.current_player();
            let deciding = game.phase() == TurnPhase::RoundInProgress;
            let pool = game.tokens_in_play();
            match game.step() {
                Ok(Progress::Finished) => {
                    prop_assert_eq!(game.placements().len(), players);
                    break;
                }
                Ok(Progress::RoundComplete) => {
                    prop_assert_eq!(game.current_player(), before);
                    prop_assert_eq!(game.tokens_in_play(), 0);
                }
                Ok(Progress::Continue) if deciding => {
                    prop_assert_eq!(game.current_player(), (before + 1) % players);
                    prop_assert_eq!(game.tokens_in_play(), pool + 1);
                }
                Ok(Progress::Continue) => {
                    prop_assert_eq!(game.current_player(), before);
                    prop_assert_eq!(game.tokens_in_play(), 0);
                }
                Err(GameError::Cheating(violation)) => {
                    prop_assert_eq!(violation.player, before);
                    prop_assert_eq!(game.players()[before].tokens(), 0);
                    prop_assert_eq!(game.phase(), TurnPhase::Aborted);
                    break;
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
            assert_tokens_conserved(&game);
        }
        assert_tokens_conserved(&game);
    }

    /// Property: a reference deck holds 23 distinct cards between 3 and 35.
    #[test]
    fn prop_deck_validity(seed in any::<u64>()) {
        let deck = build_deck(&mut StdRng::seed_from_u64(seed), 3, 35, 23).expect("valid range");
        prop_assert_eq!(deck.len(), 23);
        let unique: BTreeSet<Card> = deck.iter().copied().collect();
        prop_assert_eq!(unique.len(), 23);
        prop_assert!(deck.iter().all(|c| (3..=35).contains(&c.value())));
    }

    /// Property: only the lowest card of each run is charged, whatever the
    /// order the cards were collected in.
    #[test]
    fn prop_score_counts_run_heads(
        values in prop::collection::btree_set(3u8..=35, 0..23),
        tokens in 0u32..60,
    ) {
        let cards: Vec<Card> = values.iter().rev().copied().map(Card::new).collect();
        let expected: i32 = values
            .iter()
            .filter(|&&v| !values.contains(&(v - 1)))
            .map(|&v| i32::from(v))
            .sum::<i32>()
            - tokens as i32;
        prop_assert_eq!(count_score(&cards, tokens), expected);

        let face_total: i32 = values.iter().map(|&v| i32::from(v)).sum();
        prop_assert!(count_score(&cards, tokens) <= face_total - tokens as i32);
    }
}
