use crate::action::Action;
use crate::card::Card;

/// Interface for defining custom No Thanks! bots.
///
/// Both calls are synchronous and must return promptly. The engine calls
/// `notify_new_card` on every bot, in turn order, each time a card is revealed
/// and before anyone decides on it; `decide` is only asked of the active player.
pub trait Bot {
    /// Label used to aggregate statistics. Never consulted by the rules.
    fn identifier(&self) -> &str;

    fn notify_new_card(&mut self, _card: Card) {}

    /// Decide on `card` with `tokens_on_offer` tokens lying on it.
    ///
    /// Declining without a token aborts the game with a cheating violation;
    /// the engine does not check affordability up front.
    fn decide(&mut self, card: Card, tokens_on_offer: u32) -> Action;
}

