//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every knob has a default so a missing file still yields a usable
//! configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub trivia: TriviaSection,
    #[serde(default)]
    pub feed: FeedSection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
    /// Seconds between settlement passes in the binary loop.
    pub settle_interval_secs: u64,
    pub state_file: Option<String>,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "PICKEM".to_string(),
            settle_interval_secs: 600,
            state_file: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerSection {
    pub initial_bankroll: u64,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            initial_bankroll: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TriviaSection {
    pub paid_session_cost: u64,
    pub correct_target: u32,
    pub max_strikes: u32,
}

impl Default for TriviaSection {
    fn default() -> Self {
        Self {
            paid_session_cost: 250,
            correct_target: 5,
            max_strikes: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FeedSection {
    /// Override for the ESPN base URL (tests, mirrors).
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ledger.initial_bankroll, 10_000);
        assert_eq!(cfg.trivia.paid_session_cost, 250);
        assert_eq!(cfg.trivia.correct_target, 5);
        assert_eq!(cfg.trivia.max_strikes, 3);
        assert!(cfg.feed.base_url.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [ledger]
            initial_bankroll = 5000

            [trivia]
            paid_session_cost = 100
            correct_target = 3
            max_strikes = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ledger.initial_bankroll, 5_000);
        assert_eq!(cfg.trivia.paid_session_cost, 100);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.app.settle_interval_secs, 600);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let cfg = AppConfig::load_or_default("/tmp/pickem_no_such_config.toml").unwrap();
        assert_eq!(cfg.ledger.initial_bankroll, 10_000);
    }

    #[test]
    fn test_load_config() {
        // This test requires config.toml to be in the working directory.
        let result = AppConfig::load("config.toml");
        if let Ok(cfg) = result {
            assert_eq!(cfg.app.name, "PICKEM");
            assert!(cfg.ledger.initial_bankroll > 0);
            assert!(cfg.trivia.max_strikes > 0);
        }
        // If config.toml isn't found, that's acceptable in some test environments
    }
}
