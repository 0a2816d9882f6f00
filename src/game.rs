use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::action::{Action, PlayerId};
use crate::bot::Bot;
use crate::card::{Card, build_deck};
use crate::error::GameError;
use crate::observer::{GameEvent, GameObserver, LogObserver};
use crate::score::{RankingPolicy, rank_scores};
use crate::state::{GameSettings, PlayerState, TurnPhase};

const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub settings: GameSettings,
    pub seed: u64,
    pub ranking: RankingPolicy,
    pub shuffle_seating: bool,
}

impl GameConfig {
    pub fn new(num_players: usize, seed: u64) -> Result<Self, GameError> {
        Ok(Self {
            settings: GameSettings::new(num_players)?,
            seed,
            ranking: RankingPolicy::default(),
            shuffle_seating: true,
        })
    }
}

/// Builder that seats the bots and allows deterministic deck injection for tests.
pub struct GameBuilder {
    config: GameConfig,
    bots: Vec<Box<dyn Bot>>,
    deck: Option<Vec<Card>>,
    observer: Option<Box<dyn GameObserver>>,
}

impl GameBuilder {
    pub fn new(bots: Vec<Box<dyn Bot>>) -> Result<Self, GameError> {
        Ok(Self {
            config: GameConfig::new(bots.len(), DEFAULT_SEED)?,
            bots,
            deck: None,
            observer: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Override the rule constants. `num_players` is always taken from the bots.
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.config.settings = GameSettings {
            num_players: self.bots.len(),
            ..settings
        };
        self
    }

    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.config.ranking = ranking;
        self
    }

    /// Cards in reveal order: the first element is the first card in play.
    /// The configured deck size is replaced by the length of `deck`.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Keep the bots in the order they were given instead of shuffling seats.
    pub fn with_fixed_seating(mut self) -> Self {
        self.config.shuffle_seating = false;
        self
    }

    pub fn with_observer(mut self, observer: impl GameObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Result of a single `Game::step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// A card was revealed or a player said "no thanks"; the round goes on.
    Continue,
    /// A card was taken and more cards remain.
    RoundComplete,
    /// The last card was taken and every player has been scored.
    Finished,
}

/// Final standing of one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub seat: PlayerId,
    pub identifier: String,
    pub score: i32,
    pub position: usize,
}

/// Ranked placements of a completed game, best first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub placements: Vec<Placement>,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<&Placement> {
        self.placements.first()
    }

    pub fn placement_of(&self, seat: PlayerId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.seat == seat)
    }
}

/// Core No Thanks! engine: owns the seated bots, their ledgers and the deck.
pub struct Game {
    settings: GameSettings,
    ranking: RankingPolicy,
    bots: Vec<Box<dyn Bot>>,
    seating: Vec<String>,
    players: Vec<PlayerState>,
    deck: VecDeque<Card>,
    played: Vec<Card>,
    card_in_play: Option<Card>,
    tokens_in_play: u32,
    current_player: PlayerId,
    phase: TurnPhase,
    placements: Vec<Placement>,
    observer: Box<dyn GameObserver>,
}

impl Game {
    pub fn builder(bots: Vec<Box<dyn Bot>>) -> Result<GameBuilder, GameError> {
        GameBuilder::new(bots)
    }

    pub fn new(config: GameConfig, bots: Vec<Box<dyn Bot>>) -> Result<Self, GameError> {
        GameBuilder {
            config,
            bots,
            deck: None,
            observer: None,
        }
        .build()
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn card_in_play(&self) -> Option<Card> {
        self.card_in_play
    }

    pub fn tokens_in_play(&self) -> u32 {
        self.tokens_in_play
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    /// Bot identifiers in turn order.
    pub fn seating(&self) -> &[String] {
        &self.seating
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    /// Cards already taken, in the order they were revealed.
    pub fn played_cards(&self) -> &[Card] {
        &self.played
    }

    /// Tokens held by players plus the pool. Equals `settings().total_tokens()`
    /// in every reachable state.
    pub fn tokens_in_circulation(&self) -> u32 {
        self.players.iter().map(PlayerState::tokens).sum::<u32>() + self.tokens_in_play
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver)
    }

    /// Placements once the game is over, empty before.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.is_finished().then(|| GameOutcome {
            placements: self.placements.clone(),
        })
    }

    /// Advances the state machine by one transition: reveal a card or resolve
    /// one decision of the active player.
    pub fn step(&mut self) -> Result<Progress, GameError> {
        match self.phase {
            TurnPhase::AwaitingCard => Ok(self.reveal_card()),
            TurnPhase::RoundInProgress => self.resolve_decision(),
            TurnPhase::GameOver | TurnPhase::Aborted => Err(GameError::GameOver),
        }
    }

    /// Plays the game to the end. A cheating bot aborts it with
    /// `GameError::Cheating`.
    pub fn run(&mut self) -> Result<GameOutcome, GameError> {
        loop {
            if let Progress::Finished = self.step()? {
                return Ok(GameOutcome {
                    placements: self.placements.clone(),
                });
            }
        }
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            mut bots,
            deck,
            observer,
        } = builder;
        let mut settings = config.settings;
        settings.num_players = bots.len();
        if let Some(deck) = &deck {
            settings.deck_size = deck.len();
        }
        settings.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        if config.shuffle_seating {
            bots.shuffle(&mut rng);
        }
        let deck = match deck {
            Some(deck) => {
                Self::check_deck(&settings, &deck)?;
                deck
            }
            None => build_deck(
                &mut rng,
                settings.min_card,
                settings.max_card,
                settings.deck_size,
            )?,
        };

        let seating: Vec<String> = bots.iter().map(|bot| bot.identifier().to_string()).collect();
        let players = (0..settings.num_players)
            .map(|id| PlayerState::new(id, settings.initial_tokens))
            .collect();

        let mut game = Game {
            settings,
            ranking: config.ranking,
            bots,
            seating,
            players,
            deck: deck.into(),
            played: Vec::with_capacity(settings.deck_size),
            card_in_play: None,
            tokens_in_play: 0,
            current_player: 0,
            phase: TurnPhase::AwaitingCard,
            placements: Vec::new(),
            observer: observer.unwrap_or_else(|| Box::new(LogObserver::new())),
        };
        game.observer.observe(&GameEvent::Started {
            seating: &game.seating,
            deck_size: game.deck.len(),
        });
        Ok(game)
    }

    fn check_deck(settings: &GameSettings, deck: &[Card]) -> Result<(), GameError> {
        let mut seen = HashSet::with_capacity(deck.len());
        for &card in deck {
            if !settings.contains(card) {
                return Err(GameError::CardOutOfRange(card));
            }
            if !seen.insert(card) {
                return Err(GameError::DuplicateCard(card));
            }
        }
        Ok(())
    }

    fn reveal_card(&mut self) -> Progress {
        let Some(card) = self.deck.pop_front() else {
            self.finish();
            return Progress::Finished;
        };
        self.card_in_play = Some(card);
        self.tokens_in_play = 0;
        self.observer.observe(&GameEvent::CardRevealed {
            card,
            remaining: self.deck.len(),
        });
        for bot in &mut self.bots {
            bot.notify_new_card(card);
        }
        self.phase = TurnPhase::RoundInProgress;
        Progress::Continue
    }

    fn resolve_decision(&mut self) -> Result<Progress, GameError> {
        let card = self.card_in_play.ok_or(GameError::GameOver)?;
        let player = self.current_player;
        match self.bots[player].decide(card, self.tokens_in_play) {
            Action::Take => {
                let tokens = std::mem::take(&mut self.tokens_in_play);
                let ledger = &mut self.players[player];
                ledger.add_card(card);
                ledger.add_tokens(tokens);
                self.card_in_play = None;
                self.played.push(card);
                self.observer.observe(&GameEvent::CardTaken {
                    player,
                    card,
                    tokens,
                });
                if self.deck.is_empty() {
                    self.finish();
                    Ok(Progress::Finished)
                } else {
                    self.phase = TurnPhase::AwaitingCard;
                    Ok(Progress::RoundComplete)
                }
            }
            Action::NoThanks => {
                if let Err(violation) = self.players[player].pay_token(card) {
                    self.phase = TurnPhase::Aborted;
                    self.observer.observe(&GameEvent::Cheated(violation));
                    return Err(violation.into());
                }
                self.tokens_in_play += 1;
                self.observer.observe(&GameEvent::NoThanks {
                    player,
                    card,
                    pool: self.tokens_in_play,
                    tokens_left: self.players[player].tokens(),
                });
                self.current_player = (player + 1) % self.players.len();
                Ok(Progress::Continue)
            }
        }
    }

    fn finish(&mut self) {
        let scores: Vec<i32> = self.players.iter_mut().map(PlayerState::finalize).collect();
        self.placements = rank_scores(&scores, self.ranking)
            .into_iter()
            .map(|(seat, position)| Placement {
                seat,
                identifier: self.seating[seat].clone(),
                score: scores[seat],
                position,
            })
            .collect();
        self.phase = TurnPhase::GameOver;
        self.observer.observe(&GameEvent::Finished {
            placements: &self.placements,
        });
    }
}
