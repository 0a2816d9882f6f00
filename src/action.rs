use serde::{Deserialize, Serialize};

/// Zero-based seat of a player within one game (its position in turn order).
pub type PlayerId = usize;

/// Choice a bot makes when the card in play is offered to it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Take the card together with every token on it.
    Take,
    /// Pay one token onto the card and pass it to the next player.
    NoThanks,
}

impl Action {
    pub fn is_take(self) -> bool {
        matches!(self, Action::Take)
    }
}

impl From<bool> for Action {
    /// `true` takes the card, `false` declines it.
    fn from(take: bool) -> Self {
        if take { Action::Take } else { Action::NoThanks }
    }
}

impl From<Action> for bool {
    fn from(action: Action) -> Self {
        action.is_take()
    }
}
