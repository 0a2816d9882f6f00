use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, DECK_SIZE, INITIAL_TOKENS, MAX_CARD_VALUE, MIN_CARD_VALUE, MIN_PLAYERS};
use crate::error::{CheatingViolation, GameError};
use crate::score::count_score;

/// Rule constants for one game. Defaults follow the published rules.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    pub num_players: usize,
    pub initial_tokens: u32,
    pub min_card: u8,
    pub max_card: u8,
    pub deck_size: usize,
}

impl GameSettings {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        let settings = Self {
            num_players,
            ..Self::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.num_players < MIN_PLAYERS {
            return Err(GameError::InvalidConfiguration(
                "at least two players are required",
            ));
        }
        if self.min_card == 0 {
            return Err(GameError::InvalidConfiguration("cards must be positive"));
        }
        if self.min_card > self.max_card {
            return Err(GameError::InvalidConfiguration(
                "lowest card must not exceed highest card",
            ));
        }
        if self.deck_size == 0 {
            return Err(GameError::InvalidConfiguration("deck size must be positive"));
        }
        if self.deck_size > self.card_range() {
            return Err(GameError::InvalidConfiguration(
                "deck size exceeds the number of distinct cards",
            ));
        }
        let total = u32::try_from(self.num_players)
            .ok()
            .and_then(|players| self.initial_tokens.checked_mul(players))
            .filter(|&total| i32::try_from(total).is_ok());
        if total.is_none() {
            return Err(GameError::InvalidConfiguration(
                "too many tokens in circulation",
            ));
        }
        Ok(())
    }

    /// Number of distinct cards in `[min_card, max_card]`.
    pub fn card_range(&self) -> usize {
        usize::from(self.max_card.saturating_sub(self.min_card)) + 1
    }

    pub fn contains(&self, card: Card) -> bool {
        (self.min_card..=self.max_card).contains(&card.value())
    }

    /// Tokens in circulation for the whole game. Constant from deal to scoring.
    /// Saturates for settings that fail `validate`.
    pub fn total_tokens(&self) -> u32 {
        let players = u32::try_from(self.num_players).unwrap_or(u32::MAX);
        self.initial_tokens.saturating_mul(players)
    }
}

impl Default for GameSettings {
    /// Published rules for a two-player table.
    fn default() -> Self {
        Self {
            num_players: MIN_PLAYERS,
            initial_tokens: INITIAL_TOKENS,
            min_card: MIN_CARD_VALUE,
            max_card: MAX_CARD_VALUE,
            deck_size: DECK_SIZE,
        }
    }
}

/// Phase of the round/turn state machine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    /// Between cards; the next step reveals one.
    AwaitingCard,
    /// A card is face up and players take turns deciding on it.
    RoundInProgress,
    /// Deck exhausted and every player scored.
    GameOver,
    /// A player cheated; the game produced no result.
    Aborted,
}

/// Ledger of one seat: chips in hand and cards collected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    id: PlayerId,
    tokens: u32,
    cards: Vec<Card>,
    score: Option<i32>,
}

impl PlayerState {
    pub fn new(id: PlayerId, tokens: u32) -> Self {
        Self {
            id,
            tokens,
            cards: Vec::new(),
            score: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn tokens(&self) -> u32 {
        self.tokens
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Score fixed at the end of the game, `None` while it is still running.
    pub fn final_score(&self) -> Option<i32> {
        self.score
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn add_tokens(&mut self, tokens: u32) {
        self.tokens += tokens;
    }

    /// Pays one chip to decline `card`. A player can never go below zero.
    pub fn pay_token(&mut self, card: Card) -> Result<(), CheatingViolation> {
        match self.tokens.checked_sub(1) {
            Some(left) => {
                self.tokens = left;
                Ok(())
            }
            None => Err(CheatingViolation {
                player: self.id,
                card,
            }),
        }
    }

    /// Current score of the ledger.
    pub fn score(&self) -> i32 {
        count_score(&self.cards, self.tokens)
    }

    pub(crate) fn finalize(&mut self) -> i32 {
        let score = self.score();
        self.score = Some(score);
        score
    }
}
