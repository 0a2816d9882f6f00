use crate::action::PlayerId;
use crate::card::Card;
use crate::error::CheatingViolation;
use crate::game::Placement;
use crate::visualize::describe_event;

/// Something that happened at the table, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent<'a> {
    Started {
        seating: &'a [String],
        deck_size: usize,
    },
    CardRevealed {
        card: Card,
        remaining: usize,
    },
    NoThanks {
        player: PlayerId,
        card: Card,
        pool: u32,
        tokens_left: u32,
    },
    CardTaken {
        player: PlayerId,
        card: Card,
        tokens: u32,
    },
    Cheated(CheatingViolation),
    Finished {
        placements: &'a [Placement],
    },
}

/// Receives every event of a game. Injected through `GameBuilder::with_observer`.
pub trait GameObserver {
    fn observe(&mut self, event: &GameEvent<'_>);
}

/// Forwards events to the `log` facade. Card-level events go to `debug`,
/// individual decisions to `trace`, cheating to `warn`.
#[derive(Clone, Debug, Default)]
pub struct LogObserver {
    game: Option<usize>,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every line with the index of the game within a simulation.
    pub fn for_game(game: usize) -> Self {
        Self { game: Some(game) }
    }

    fn prefix(&self) -> String {
        self.game.map(|g| format!("[game {g}] ")).unwrap_or_default()
    }
}

impl GameObserver for LogObserver {
    fn observe(&mut self, event: &GameEvent<'_>) {
        let level = match event {
            GameEvent::NoThanks { .. } => log::Level::Trace,
            GameEvent::Cheated(_) => log::Level::Warn,
            _ => log::Level::Debug,
        };
        if log::log_enabled!(level) {
            log::log!(level, "{}{}", self.prefix(), describe_event(event));
        }
    }
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {
    fn observe(&mut self, _event: &GameEvent<'_>) {}
}
