//! Scoring utilities for No Thanks! games.
//!
//! Scoring rule:
//!   points = sum of the lowest card of every consecutive run - tokens left
//! Lower is better. A card that extends a run adds nothing, its face value is dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::Card;

/// Final score for a hand of `cards` and `tokens` unspent chips.
pub fn count_score(cards: &[Card], tokens: u32) -> i32 {
    let penalty: i32 = run_heads(cards)
        .into_iter()
        .map(|card| i32::from(card.value()))
        .sum();
    penalty.saturating_sub(i32::try_from(tokens).unwrap_or(i32::MAX))
}

/// Lowest card of every consecutive run, ascending.
pub fn run_heads(cards: &[Card]) -> Vec<Card> {
    let mut sorted = cards.to_vec();
    sorted.sort_unstable();
    let mut heads = Vec::new();
    let mut previous: Option<Card> = None;
    for card in sorted {
        if !previous.is_some_and(|prev| card.follows(prev)) {
            heads.push(card);
        }
        previous = Some(card);
    }
    heads
}

/// How players with equal scores are ordered.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum RankingPolicy {
    /// Sort by score, then by seat. Every player gets a distinct position.
    #[default]
    Stable,
    /// Key players by score and let the later seat win a tie. Players that lose a
    /// tie disappear from the ranking and positions count distinct scores only.
    CollapseTies,
}

/// Ranks seats by ascending score. Returns `(seat, position)` pairs, best first,
/// with positions starting at 1.
pub fn rank_scores(scores: &[i32], policy: RankingPolicy) -> Vec<(PlayerId, usize)> {
    let ordered: Vec<PlayerId> = match policy {
        RankingPolicy::Stable => {
            let mut seats: Vec<PlayerId> = (0..scores.len()).collect();
            seats.sort_by_key(|&seat| (scores[seat], seat));
            seats
        }
        RankingPolicy::CollapseTies => {
            let mut by_score: BTreeMap<i32, PlayerId> = BTreeMap::new();
            for (seat, &score) in scores.iter().enumerate() {
                by_score.insert(score, seat);
            }
            by_score.into_values().collect()
        }
    };
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, seat)| (seat, idx + 1))
        .collect()
}
