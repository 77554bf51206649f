#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence gateway that mirrors lifetime progress into a key-value store.
//!
//! Values use the same keys and encodings as the browser save data: integers
//! as decimal strings, achievements as a JSON array of ids and power-up usage
//! as a JSON object of flags.

mod store;

pub use store::{corrupt_backup_path, JsonFileStore, KeyValueStore, MemoryStore, StoreError};

use std::collections::BTreeSet;

use hellas_quest_core::{AchievementId, Event, LifetimeState, PowerUpUsage};
use tracing::warn;

/// Key holding the lifetime number of correct answers.
pub const TOTAL_CORRECT_ANSWERS_KEY: &str = "totalCorrectAnswers";
/// Key holding the unlocked achievement ids.
pub const ACHIEVEMENTS_KEY: &str = "achievements";
/// Key holding the best score.
pub const HIGH_SCORE_KEY: &str = "greekGameHighScore";
/// Key holding the level reached with the best score.
pub const HIGH_SCORE_LEVEL_KEY: &str = "greekGameHighScoreLevel";
/// Key holding the power-ups used in the current game.
pub const POWER_UPS_USED_KEY: &str = "powerUpsUsed";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Entry {
    TotalCorrectAnswers,
    Achievements,
    HighScore,
    PowerUpsUsed,
}

/// Loads and records [`LifetimeState`] through a [`KeyValueStore`].
#[derive(Debug)]
pub struct Gateway<S> {
    store: S,
}

impl<S: KeyValueStore> Gateway<S> {
    /// Wraps `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Read-only access to the wrapped store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Reads the lifetime state; missing or malformed entries fall back to defaults.
    #[must_use]
    pub fn load(&self) -> LifetimeState {
        LifetimeState {
            total_correct_answers: self.read_integer(TOTAL_CORRECT_ANSWERS_KEY),
            achievements: self.read_achievements(),
            high_score: self.read_integer(HIGH_SCORE_KEY),
            high_score_level: self.read_integer(HIGH_SCORE_LEVEL_KEY),
            power_ups_used: self.read_power_ups_used(),
        }
    }

    /// Writes the entries touched by `events`, taking values from `lifetime`.
    pub fn record(&mut self, events: &[Event], lifetime: &LifetimeState) -> Result<(), StoreError> {
        let touched: BTreeSet<Entry> = events.iter().filter_map(touched_entry).collect();
        for entry in touched {
            match entry {
                Entry::TotalCorrectAnswers => self.store.set(
                    TOTAL_CORRECT_ANSWERS_KEY,
                    &lifetime.total_correct_answers.to_string(),
                )?,
                Entry::Achievements => {
                    let ids: Vec<AchievementId> = lifetime.achievements.iter().copied().collect();
                    self.store
                        .set(ACHIEVEMENTS_KEY, &serde_json::to_string(&ids)?)?;
                }
                Entry::HighScore => {
                    self.store
                        .set(HIGH_SCORE_KEY, &lifetime.high_score.to_string())?;
                    self.store.set(
                        HIGH_SCORE_LEVEL_KEY,
                        &lifetime.high_score_level.to_string(),
                    )?;
                }
                Entry::PowerUpsUsed => self.store.set(
                    POWER_UPS_USED_KEY,
                    &serde_json::to_string(&lifetime.power_ups_used)?,
                )?,
            }
        }
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "failed to read stored value; using default");
                None
            }
        }
    }

    fn read_integer<T>(&self, key: &str) -> T
    where
        T: std::str::FromStr + Default,
    {
        let Some(raw) = self.read(key) else {
            return T::default();
        };
        raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "stored value is not a number; using default");
            T::default()
        })
    }

    fn read_achievements(&self) -> BTreeSet<AchievementId> {
        let Some(raw) = self.read(ACHIEVEMENTS_KEY) else {
            return BTreeSet::new();
        };
        let names: Vec<String> = match serde_json::from_str(&raw) {
            Ok(names) => names,
            Err(error) => {
                warn!(key = ACHIEVEMENTS_KEY, %error, "stored achievements are malformed; using none");
                return BTreeSet::new();
            }
        };
        names
            .into_iter()
            .filter_map(|name| {
                match serde_json::from_value(serde_json::Value::String(name.clone())) {
                    Ok(id) => Some(id),
                    Err(_) => {
                        warn!(achievement = %name, "skipping unknown stored achievement");
                        None
                    }
                }
            })
            .collect()
    }

    fn read_power_ups_used(&self) -> PowerUpUsage {
        let Some(raw) = self.read(POWER_UPS_USED_KEY) else {
            return PowerUpUsage::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|error| {
            warn!(key = POWER_UPS_USED_KEY, %error, "stored power-up usage is malformed; using none");
            PowerUpUsage::default()
        })
    }
}

fn touched_entry(event: &Event) -> Option<Entry> {
    match event {
        Event::CorrectAnswerRecorded { .. } => Some(Entry::TotalCorrectAnswers),
        Event::AchievementUnlocked { .. } => Some(Entry::Achievements),
        Event::HighScoreRecorded { .. } => Some(Entry::HighScore),
        Event::PowerUpActivated { .. } | Event::SessionStarted { .. } | Event::SessionReset => {
            Some(Entry::PowerUpsUsed)
        }
        _ => None,
    }
}
