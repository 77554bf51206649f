//! Tunable session rules loaded from TOML.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use hellas_quest_core::{CategoryFilter, Difficulty};
use hellas_quest_system_power_ups::PowerUpConfig;
use hellas_quest_system_scoring::TimeBudget;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read session config at {path}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML or has mistyped fields.
    #[error("failed to parse session config")]
    Parse(#[from] toml::de::Error),
    /// A game needs at least one life.
    #[error("starting lives must be at least one")]
    NoLives,
}

/// Session rules; every field falls back to the classic game when omitted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lives granted before hero bonuses.
    pub starting_lives: u32,
    /// Per-question countdown settings.
    pub time_budget: TimeBudget,
    /// Remaining seconds at or below which the countdown is flagged as low.
    pub low_time_secs: u32,
    /// Milliseconds the feedback after a correct answer stays on screen.
    pub correct_feedback_ms: u64,
    /// Milliseconds the feedback after a lost life stays on screen.
    pub incorrect_feedback_ms: u64,
    /// Seconds added by a time freeze.
    pub time_freeze_bonus_secs: u32,
    /// Power-up allowances.
    pub power_ups: PowerUpConfig,
    /// Difficulty preselected before the player chooses.
    pub default_difficulty: Difficulty,
    /// Category preselected before the player chooses.
    pub default_category: CategoryFilter,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            time_budget: TimeBudget::default(),
            low_time_secs: 5,
            correct_feedback_ms: 1500,
            incorrect_feedback_ms: 2000,
            time_freeze_bonus_secs: 15,
            power_ups: PowerUpConfig::default(),
            default_difficulty: Difficulty::Medium,
            default_category: CategoryFilter::All,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        Ok(config)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub(crate) fn feedback_delay(&self, correct: bool) -> Duration {
        if correct {
            Duration::from_millis(self.correct_feedback_ms)
        } else {
            Duration::from_millis(self.incorrect_feedback_ms)
        }
    }
}
