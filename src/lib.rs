//! No Thanks! rule engine and Monte-Carlo harness for comparing bot strategies.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod error;
pub mod game;
pub mod observer;
pub mod score;
pub mod simulation;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, PlayerId};
pub use crate::bot::Bot;
pub use crate::bots::{
    AlwaysTakeBot, BotSpec, BotSpecError, RandomBot, TrackingBot, create_bot_from_spec,
    label_for_spec,
};
pub use crate::card::{Card, build_deck};
pub use crate::error::{CheatingViolation, GameError};
pub use crate::game::{Game, GameBuilder, GameConfig, GameOutcome, Placement, Progress};
pub use crate::observer::{GameEvent, GameObserver, LogObserver, NullObserver};
pub use crate::score::{RankingPolicy, count_score, rank_scores};
pub use crate::simulation::{BotFactory, BotStats, Report, Roster, Simulation, SimulationConfig};
pub use crate::state::{GameSettings, PlayerState, TurnPhase};
pub use crate::visualize::{describe_event, render_outcome, render_report, render_table};
