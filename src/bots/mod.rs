pub mod always_take;
pub mod random;
pub mod registry;
pub mod tracking;

pub use always_take::AlwaysTakeBot;
pub use random::RandomBot;
pub use registry::{BotSpec, BotSpecError, create_bot_from_spec, label_for_spec};
pub use tracking::TrackingBot;
