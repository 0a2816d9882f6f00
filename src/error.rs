use thiserror::Error;

use crate::action::PlayerId;
use crate::card::Card;

/// Errors that can occur when building or advancing a game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("card {0} appears more than once in the deck")]
    DuplicateCard(Card),
    #[error("card {0} lies outside the configured card range")]
    CardOutOfRange(Card),
    #[error(transparent)]
    Cheating(#[from] CheatingViolation),
    #[error("game is already over")]
    GameOver,
}

impl GameError {
    /// True for the in-game violation that aborts a single game, false for
    /// errors that stop a game from being set up or driven at all.
    pub fn is_cheating(&self) -> bool {
        matches!(self, GameError::Cheating(_))
    }
}

/// A player said "no thanks" without a token left to pay with.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("player {player} declined card {card} without any tokens")]
pub struct CheatingViolation {
    pub player: PlayerId,
    pub card: Card,
}
