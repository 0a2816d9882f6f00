use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::bot::Bot;
use crate::bots::{AlwaysTakeBot, RandomBot, TrackingBot};
use crate::state::GameSettings;

/// Problems found while parsing a CLI-style bot spec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BotSpecError {
    #[error("unrecognized bot spec: {0}")]
    Unknown(String),
    #[error("take probability must be a number between 0 and 1: {0}")]
    InvalidProbability(String),
    #[error("invalid seed value: {0}")]
    InvalidSeed(String),
}

#[derive(Clone, Debug, PartialEq)]
enum Kind {
    AlwaysTake,
    Random { probability: f64, label: String },
    Tracking,
}

/// A parsed bot spec that can build fresh bots for every game.
#[derive(Clone, Debug, PartialEq)]
pub struct BotSpec {
    kind: Kind,
    seed: Option<u64>,
}

impl BotSpec {
    /// Supported specs:
    /// - always-take
    /// - dummy[:seed]
    /// - lessdummy[:seed]
    /// - random:<probability>[:seed]
    /// - tracking[:seed]
    pub fn parse(spec: &str) -> Result<Self, BotSpecError> {
        let mut parts = spec.trim().split(':');
        let head = parts.next().unwrap_or_default().to_ascii_lowercase();
        let kind = match head.as_str() {
            "always-take" | "abstract" => Kind::AlwaysTake,
            "dummy" => Kind::Random {
                probability: super::random::DUMMY_TAKE_PROBABILITY,
                label: head.clone(),
            },
            "lessdummy" => Kind::Random {
                probability: super::random::LESS_DUMMY_TAKE_PROBABILITY,
                label: head.clone(),
            },
            "random" => {
                let raw = parts
                    .next()
                    .ok_or_else(|| BotSpecError::InvalidProbability(spec.to_string()))?;
                let probability = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|p| (0.0..=1.0).contains(p))
                    .ok_or_else(|| BotSpecError::InvalidProbability(raw.to_string()))?;
                Kind::Random {
                    probability,
                    label: format!("random({probability})"),
                }
            }
            "tracking" => Kind::Tracking,
            _ => return Err(BotSpecError::Unknown(spec.to_string())),
        };
        let seed = match parts.next() {
            Some(raw) if !matches!(kind, Kind::AlwaysTake) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| BotSpecError::InvalidSeed(raw.to_string()))?,
            ),
            Some(_) => return Err(BotSpecError::Unknown(spec.to_string())),
            None => None,
        };
        if parts.next().is_some() {
            return Err(BotSpecError::Unknown(spec.to_string()));
        }
        Ok(Self { kind, seed })
    }

    /// Identifier the built bots report.
    pub fn label(&self) -> String {
        match &self.kind {
            Kind::AlwaysTake => String::from("always-take"),
            Kind::Random { label, .. } => label.clone(),
            Kind::Tracking => String::from("tracking"),
        }
    }

    /// Builds a bot for the published rules. A seed embedded in the spec
    /// string wins over `seed`.
    pub fn build(&self, seed: u64) -> Box<dyn Bot> {
        self.build_for(seed, &GameSettings::default())
    }

    /// Builds a bot for a table played under `settings`.
    pub fn build_for(&self, seed: u64, settings: &GameSettings) -> Box<dyn Bot> {
        let rng = StdRng::seed_from_u64(self.seed.unwrap_or(seed));
        match &self.kind {
            Kind::AlwaysTake => Box::new(AlwaysTakeBot::new()),
            Kind::Random { probability, label } => {
                Box::new(RandomBot::new(rng, *probability, label.clone()))
            }
            Kind::Tracking => Box::new(TrackingBot::with_tokens(rng, settings.initial_tokens)),
        }
    }
}

/// Create a bot instance from a CLI-style spec, see `BotSpec::parse`.
pub fn create_bot_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Bot>, BotSpecError> {
    let parsed = BotSpec::parse(spec)?;
    Ok(parsed.build(seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9)))
}

/// Identifier a bot built from `spec` reports.
pub fn label_for_spec(spec: &str) -> Result<String, BotSpecError> {
    Ok(BotSpec::parse(spec)?.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::card::Card;

    #[test]
    fn parses_reference_bots() -> Result<(), BotSpecError> {
        assert_eq!(BotSpec::parse("dummy")?.label(), "dummy");
        assert_eq!(BotSpec::parse("LessDummy:42")?.label(), "lessdummy");
        assert_eq!(BotSpec::parse("tracking")?.label(), "tracking");
        assert_eq!(BotSpec::parse("abstract")?.label(), "always-take");
        assert_eq!(BotSpec::parse("random:0.3:7")?.label(), "random(0.3)");
        Ok(())
    }

    #[test]
    fn rejects_bad_specs() {
        assert!(matches!(
            BotSpec::parse("human"),
            Err(BotSpecError::Unknown(_))
        ));
        assert!(matches!(
            BotSpec::parse("random:1.5"),
            Err(BotSpecError::InvalidProbability(_))
        ));
        assert!(matches!(
            BotSpec::parse("random"),
            Err(BotSpecError::InvalidProbability(_))
        ));
        assert!(matches!(
            BotSpec::parse("tracking:abc"),
            Err(BotSpecError::InvalidSeed(_))
        ));
    }

    #[test]
    fn labels_come_from_the_spec_string() -> Result<(), BotSpecError> {
        assert_eq!(label_for_spec("dummy:3")?, "dummy");
        assert_eq!(label_for_spec("always-take")?, "always-take");
        assert_eq!(label_for_spec("random:0.25")?, "random(0.25)");
        assert!(matches!(
            label_for_spec("greedy"),
            Err(BotSpecError::Unknown(_))
        ));
        Ok(())
    }

    #[test]
    fn tracking_bots_start_with_the_table_purse() {
        let settings = GameSettings {
            initial_tokens: 1,
            ..GameSettings::default()
        };
        let mut bot = BotSpec::parse("tracking")
            .expect("known spec")
            .build_for(5, &settings);
        assert_eq!(bot.decide(Card::new(30), 0), Action::NoThanks);
        assert_eq!(bot.decide(Card::new(30), 0), Action::Take);
    }

    #[test]
    fn built_bots_report_their_label() -> Result<(), BotSpecError> {
        let bot = create_bot_from_spec("lessdummy", 0, 1)?;
        assert_eq!(bot.identifier(), "lessdummy");
        assert_eq!(create_bot_from_spec(" Tracking:9", 1, 1)?.identifier(), "tracking");
        Ok(())
    }
}
