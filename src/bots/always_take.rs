use crate::action::Action;
use crate::bot::Bot;
use crate::card::Card;

/// Takes every card it is offered, so it never pays a token.
pub struct AlwaysTakeBot {
    identifier: String,
}

impl AlwaysTakeBot {
    pub fn new() -> Self {
        Self::named("always-take")
    }

    pub fn named(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl Default for AlwaysTakeBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Bot for AlwaysTakeBot {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn decide(&mut self, _card: Card, _tokens_on_offer: u32) -> Action {
        Action::Take
    }
}
