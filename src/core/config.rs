/// Engine configuration: reading budgets, reading speed, proposal limit.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::profile::DepthPreference;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("reading budget for {depth} must be a positive number of minutes, got {value}")]
    InvalidBudget { depth: &'static str, value: f64 },
    #[error("words per minute must be positive, got {0}")]
    InvalidReadingSpeed(f64),
}

/// Cumulative reading-time ceiling per depth, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingBudgets {
    pub short: f64,
    pub normal: f64,
    pub deep: f64,
}

impl Default for ReadingBudgets {
    fn default() -> Self {
        Self {
            short: 1.0,
            normal: 3.0,
            deep: 5.0,
        }
    }
}

impl ReadingBudgets {
    pub fn minutes_for(&self, depth: DepthPreference) -> f64 {
        match depth {
            DepthPreference::Short => self.short,
            DepthPreference::Normal => self.normal,
            DepthPreference::Deep => self.deep,
        }
    }
}

/// Tunables for narrative assembly. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub budgets: ReadingBudgets,
    pub words_per_minute: f64,
    /// Upper bound on "continue reading" prompts.
    pub max_proposals: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budgets: ReadingBudgets::default(),
            words_per_minute: 200.0,
            max_proposals: 3,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a RON string.
    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for depth in [
            DepthPreference::Short,
            DepthPreference::Normal,
            DepthPreference::Deep,
        ] {
            let value = self.budgets.minutes_for(depth);
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidBudget {
                    depth: depth.name(),
                    value,
                });
            }
        }
        if !self.words_per_minute.is_finite() || self.words_per_minute <= 0.0 {
            return Err(ConfigError::InvalidReadingSpeed(self.words_per_minute));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.budgets.minutes_for(DepthPreference::Short), 1.0);
        assert_eq!(config.budgets.minutes_for(DepthPreference::Normal), 3.0);
        assert_eq!(config.budgets.minutes_for(DepthPreference::Deep), 5.0);
        assert_eq!(config.words_per_minute, 200.0);
        assert_eq!(config.max_proposals, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = EngineConfig::parse_ron("(budgets: (deep: 12.0), max_proposals: 5)").unwrap();
        assert_eq!(config.budgets.deep, 12.0);
        assert_eq!(config.budgets.short, 1.0);
        assert_eq!(config.words_per_minute, 200.0);
        assert_eq!(config.max_proposals, 5);
    }

    #[test]
    fn rejects_non_positive_budget() {
        let err = EngineConfig::parse_ron("(budgets: (normal: 0.0))").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBudget { depth: "normal", .. }));
    }

    #[test]
    fn rejects_zero_reading_speed() {
        let err = EngineConfig::parse_ron("(words_per_minute: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidReadingSpeed(_)));
    }

    #[test]
    fn rejects_malformed_ron() {
        assert!(matches!(
            EngineConfig::parse_ron("(budgets: oops"),
            Err(ConfigError::Ron(_))
        ));
    }

    #[test]
    fn load_fixture_config() {
        let config =
            EngineConfig::load_from_ron(Path::new("tests/fixtures/engine_config.ron")).unwrap();
        assert_eq!(config.words_per_minute, 180.0);
        assert_eq!(config.max_proposals, 2);
    }
}
