//! Monte-Carlo harness: plays many independent games and averages positions
//! and scores per bot identifier.
//!
//! Games run in batches on a rayon pool. Every game derives its own `StdRng`
//! seeds from `(seed, game index)`, so a report does not depend on the number of
//! threads. Each batch is folded into one `Report` and merged into the running
//! total once.

use std::collections::BTreeMap;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bot::Bot;
use crate::bots::{BotSpec, BotSpecError};
use crate::error::GameError;
use crate::game::{Game, GameBuilder, GameOutcome};
use crate::observer::LogObserver;
use crate::score::RankingPolicy;
use crate::state::GameSettings;

pub const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;
pub const DEFAULT_BATCH_SIZE: usize = 4096;

const GAME_STREAM: u64 = 0x5EED_15;

/// Builds a fresh bot for every game. Implemented by `BotSpec` and by any
/// `Fn(u64) -> Box<dyn Bot>` closure that is `Send + Sync`; closures ignore
/// the table settings.
pub trait BotFactory: Send + Sync {
    fn create(&self, seed: u64, settings: &GameSettings) -> Box<dyn Bot>;
}

impl BotFactory for BotSpec {
    fn create(&self, seed: u64, settings: &GameSettings) -> Box<dyn Bot> {
        self.build_for(seed, settings)
    }
}

impl<F> BotFactory for F
where
    F: Fn(u64) -> Box<dyn Bot> + Send + Sync,
{
    fn create(&self, seed: u64, _settings: &GameSettings) -> Box<dyn Bot> {
        self(seed)
    }
}

/// Bots taking part in every game. The same strategy may appear several times.
#[derive(Default)]
pub struct Roster {
    entries: Vec<Box<dyn BotFactory>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs<I, S>(specs: I) -> Result<Self, BotSpecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for spec in specs {
            roster.push(BotSpec::parse(spec.as_ref())?);
        }
        Ok(roster)
    }

    pub fn with(mut self, factory: impl BotFactory + 'static) -> Self {
        self.push(factory);
        self
    }

    pub fn push(&mut self, factory: impl BotFactory + 'static) {
        self.entries.push(Box::new(factory));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn seat(&self, seed: u64, game: u64, settings: &GameSettings) -> Vec<Box<dyn Bot>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, factory)| factory.create(mix_seed(seed, game, idx as u64 + 1), settings))
            .collect()
    }
}

/// Knobs of a simulation run.
#[derive(Clone, Copy, Debug)]
pub struct SimulationConfig {
    pub games: usize,
    pub seed: u64,
    /// Rule template; `num_players` is replaced by the roster size.
    pub settings: GameSettings,
    pub ranking: RankingPolicy,
    /// Games per reduction step.
    pub batch_size: usize,
    /// Worker threads, rayon's global pool when `None`.
    pub threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 10_000,
            seed: DEFAULT_SEED,
            settings: GameSettings::default(),
            ranking: RankingPolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            threads: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Running sums for one bot identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStats {
    /// Ranked seats over completed games.
    pub seats: u64,
    pub total_position: u64,
    pub total_score: i64,
}

impl BotStats {
    pub fn average_position(&self) -> f64 {
        if self.seats == 0 {
            return 0.0;
        }
        self.total_position as f64 / self.seats as f64
    }

    pub fn average_score(&self) -> f64 {
        if self.seats == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.seats as f64
    }

    fn merge(&mut self, other: BotStats) {
        self.seats += other.seats;
        self.total_position += other.total_position;
        self.total_score += other.total_score;
    }
}

/// Aggregate of a simulation. Only completed games contribute to `bots`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub games_requested: usize,
    pub completed: usize,
    pub skipped: usize,
    pub bots: BTreeMap<String, BotStats>,
}

impl Report {
    /// Folds the placements of one completed game into the sums.
    pub fn record(&mut self, outcome: &GameOutcome) {
        self.completed += 1;
        for placement in &outcome.placements {
            let stats = self.bots.entry(placement.identifier.clone()).or_default();
            stats.seats += 1;
            stats.total_position += placement.position as u64;
            stats.total_score += i64::from(placement.score);
        }
    }

    /// Counts a game thrown out for cheating.
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Records the result of one game: outcomes are aggregated, cheating is
    /// counted as a skip, any other error is returned.
    pub fn absorb(&mut self, result: Result<GameOutcome, GameError>) -> Result<(), GameError> {
        match result {
            Ok(outcome) => self.record(&outcome),
            Err(err) if err.is_cheating() => self.record_skip(),
            Err(err) => return Err(err),
        }
        Ok(())
    }

    pub fn merge(mut self, other: Report) -> Report {
        self.games_requested += other.games_requested;
        self.completed += other.completed;
        self.skipped += other.skipped;
        for (identifier, stats) in other.bots {
            self.bots.entry(identifier).or_default().merge(stats);
        }
        self
    }

    pub fn stats(&self, identifier: &str) -> Option<&BotStats> {
        self.bots.get(identifier)
    }

    pub fn average_position(&self, identifier: &str) -> Option<f64> {
        self.stats(identifier).map(BotStats::average_position)
    }

    pub fn average_score(&self, identifier: &str) -> Option<f64> {
        self.stats(identifier).map(BotStats::average_score)
    }
}

/// A roster bound to a configuration, ready to play.
pub struct Simulation {
    config: SimulationConfig,
    roster: Roster,
}

impl Simulation {
    /// Fails for configurations that cannot produce a single game.
    pub fn new(config: SimulationConfig, roster: Roster) -> Result<Self, GameError> {
        let settings = GameSettings {
            num_players: roster.len(),
            ..config.settings
        };
        settings.validate()?;
        if config.batch_size == 0 {
            return Err(GameError::InvalidConfiguration("batch size must be positive"));
        }
        if config.threads == Some(0) {
            return Err(GameError::InvalidConfiguration(
                "thread count must be positive",
            ));
        }
        Ok(Self {
            config: SimulationConfig { settings, ..config },
            roster,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Sets up game number `game` with its own seating, deck and bot seeds.
    pub fn prepare(&self, game: usize) -> Result<Game, GameError> {
        let index = game as u64;
        GameBuilder::new(self.roster.seat(self.config.seed, index, &self.config.settings))?
            .with_settings(self.config.settings)
            .with_ranking(self.config.ranking)
            .with_seed(mix_seed(self.config.seed, index, GAME_STREAM))
            .with_observer(LogObserver::for_game(game))
            .build()
    }

    /// Plays game number `game` to completion. Replaying an index gives the
    /// same result.
    pub fn play(&self, game: usize) -> Result<GameOutcome, GameError> {
        self.prepare(game)?.run()
    }

    pub fn run(&self) -> Result<Report, GameError> {
        match self.config.threads {
            Some(threads) => ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|_| GameError::InvalidConfiguration("could not start worker threads"))?
                .install(|| self.run_batches()),
            None => self.run_batches(),
        }
    }

    fn run_batches(&self) -> Result<Report, GameError> {
        let mut report = Report::default();
        let mut start = 0;
        while start < self.config.games {
            let end = (start + self.config.batch_size).min(self.config.games);
            let batch = self.run_batch(start, end)?;
            log::info!(
                "games {start}..{end}: {} completed, {} skipped",
                batch.completed,
                batch.skipped
            );
            report = report.merge(batch);
            start = end;
        }
        report.games_requested = self.config.games;
        Ok(report)
    }

    fn run_batch(&self, start: usize, end: usize) -> Result<Report, GameError> {
        (start..end)
            .into_par_iter()
            .map(|game| self.play(game))
            .try_fold(Report::default, |mut report: Report, result| -> Result<Report, GameError> {
                report.absorb(result)?;
                Ok(report)
            })
            .try_reduce(Report::default, |a, b| Ok(a.merge(b)))
    }
}

/// Derives an independent stream seed for `(game, stream)` from a base seed.
pub fn mix_seed(base: u64, game: u64, stream: u64) -> u64 {
    let mut z =
        base ^ (game.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (stream.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
