#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use nothanks::{Action, Bot, Card, Game};

pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Bot that replays a fixed list of decisions, then falls back to one answer.
pub struct ScriptedBot {
    identifier: String,
    decisions: VecDeque<Action>,
    fallback: Action,
    log: Option<CallLog>,
}

impl ScriptedBot {
    pub fn new(identifier: &str, decisions: &[Action], fallback: Action) -> Self {
        Self {
            identifier: identifier.to_string(),
            decisions: decisions.iter().copied().collect(),
            fallback,
            log: None,
        }
    }

    pub fn always(identifier: &str, action: Action) -> Self {
        Self::new(identifier, &[], action)
    }

    pub fn logging(mut self, log: &CallLog) -> Self {
        self.log = Some(Rc::clone(log));
        self
    }

    pub fn boxed(self) -> Box<dyn Bot> {
        Box::new(self)
    }
}

impl Bot for ScriptedBot {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn notify_new_card(&mut self, card: Card) {
        if let Some(log) = &self.log {
            log.borrow_mut()
                .push(format!("{} notified {}", self.identifier, card.value()));
        }
    }

    fn decide(&mut self, card: Card, tokens_on_offer: u32) -> Action {
        if let Some(log) = &self.log {
            log.borrow_mut().push(format!(
                "{} decides {} with {}",
                self.identifier,
                card.value(),
                tokens_on_offer
            ));
        }
        self.decisions.pop_front().unwrap_or(self.fallback)
    }
}

pub fn deck(values: &[u8]) -> Vec<Card> {
    values.iter().copied().map(Card::new).collect()
}

pub fn assert_tokens_conserved(game: &Game) {
    assert_eq!(
        game.tokens_in_circulation(),
        game.settings().total_tokens(),
        "tokens leaked: players {:?}, pool {}",
        game.players().iter().map(|p| p.tokens()).collect::<Vec<_>>(),
        game.tokens_in_play()
    );
}
