#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring and progression rules.
//!
//! Points, per-question time budgets, level-driven difficulty and stage
//! milestones are all computed here from plain inputs so the session only has
//! to thread its state through.

use hellas_quest_core::{Character, Difficulty};
use serde::Deserialize;

/// Points granted for every correct answer.
pub const BASE_POINTS: u64 = 100;
/// Points added per level.
pub const LEVEL_POINTS: u64 = 50;
/// Points added per streak step.
pub const STREAK_POINTS: u64 = 10;
/// Bonus for answering while plenty of time is left.
pub const FAST_ANSWER_BONUS: u64 = 50;
/// Remaining seconds that must be exceeded to earn [`FAST_ANSWER_BONUS`].
pub const FAST_ANSWER_THRESHOLD_SECS: u32 = 20;
/// Multiplier applied while double points is armed.
pub const DOUBLE_POINTS_MULTIPLIER: u64 = 2;
/// Consecutive correct answers required to advance a stage.
pub const STAGE_STREAK_INTERVAL: u32 = 5;

/// Inputs required to score a correct answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreInputs {
    /// Level at the time of the answer.
    pub level: u32,
    /// Streak value fed into the formula.
    pub streak: u32,
    /// Whole seconds left on the countdown when the answer was submitted.
    pub time_remaining: u32,
    /// Hero selected for the session.
    pub character: Option<Character>,
    /// Whether double points is armed for this answer.
    pub double_points: bool,
}

/// Computes the points earned by a correct answer.
///
/// Multipliers apply before the hero's additive streak bonus.
#[must_use]
pub fn points_for_correct_answer(inputs: &ScoreInputs) -> u64 {
    let streak = u64::from(inputs.streak);
    let mut points = BASE_POINTS
        .saturating_add(u64::from(inputs.level).saturating_mul(LEVEL_POINTS))
        .saturating_add(streak.saturating_mul(STREAK_POINTS));
    if inputs.time_remaining > FAST_ANSWER_THRESHOLD_SECS {
        points = points.saturating_add(FAST_ANSWER_BONUS);
    }

    if let Some(character) = inputs.character {
        points = points.saturating_mul(character.points_multiplier());
    }
    if inputs.double_points {
        points = points.saturating_mul(DOUBLE_POINTS_MULTIPLIER);
    }
    if let Some(character) = inputs.character {
        points = points.saturating_add(streak.saturating_mul(character.streak_bonus_per_step()));
    }
    points
}

/// Per-question countdown settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeBudget {
    /// Seconds granted at level one.
    pub base_secs: u32,
    /// Seconds removed for every level above one.
    pub step_secs: u32,
    /// Lower bound before the hero bonus applies.
    pub floor_secs: u32,
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self {
            base_secs: 30,
            step_secs: 2,
            floor_secs: 15,
        }
    }
}

impl TimeBudget {
    /// Seconds granted for a question at `level`, including the hero bonus.
    #[must_use]
    pub fn seconds_for(&self, level: u32, character: Option<Character>) -> u32 {
        let reduction = level.saturating_sub(1).saturating_mul(self.step_secs);
        let seconds = self
            .base_secs
            .saturating_sub(reduction)
            .max(self.floor_secs);
        let percent = character.map_or(100, Character::time_bonus_percent);
        let scaled = u64::from(seconds) * u64::from(percent) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// Difficulty derived from the level after a level-up.
#[must_use]
pub const fn difficulty_for_level(level: u32) -> Difficulty {
    if level > 3 {
        Difficulty::Hard
    } else if level > 1 {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

/// Reports whether reaching `streak` advances the stage.
#[must_use]
pub const fn reaches_stage_milestone(streak: u32) -> bool {
    streak > 0 && streak % STAGE_STREAK_INTERVAL == 0
}

/// Correct answers collected toward the next streak stage.
#[must_use]
pub const fn stage_progress(streak: u32) -> u32 {
    streak % STAGE_STREAK_INTERVAL
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(level: u32, streak: u32, time_remaining: u32) -> ScoreInputs {
        ScoreInputs {
            level,
            streak,
            time_remaining,
            character: None,
            double_points: false,
        }
    }

    #[test]
    fn fast_first_answer_scores_two_hundred() {
        assert_eq!(points_for_correct_answer(&inputs(1, 0, 25)), 200);
    }

    #[test]
    fn fast_bonus_requires_more_than_twenty_seconds() {
        assert_eq!(points_for_correct_answer(&inputs(1, 0, 20)), 150);
        assert_eq!(points_for_correct_answer(&inputs(1, 0, 21)), 200);
    }

    #[test]
    fn achilles_bonus_is_added_after_multipliers() {
        let scored = ScoreInputs {
            character: Some(Character::Achilles),
            ..inputs(2, 5, 10)
        };
        assert_eq!(points_for_correct_answer(&scored), 350);

        let doubled = ScoreInputs {
            double_points: true,
            ..scored
        };
        assert_eq!(points_for_correct_answer(&doubled), 600);
    }

    #[test]
    fn double_points_doubles_total() {
        let scored = ScoreInputs {
            double_points: true,
            ..inputs(1, 0, 29)
        };
        assert_eq!(points_for_correct_answer(&scored), 400);
    }

    #[test]
    fn heracles_and_double_points_stack() {
        let scored = ScoreInputs {
            character: Some(Character::Heracles),
            double_points: true,
            ..inputs(3, 2, 5)
        };
        assert_eq!(points_for_correct_answer(&scored), (100 + 150 + 20) * 4);
    }

    #[test]
    fn time_budget_shrinks_with_level_down_to_floor() {
        let budget = TimeBudget::default();
        assert_eq!(budget.seconds_for(1, None), 30);
        assert_eq!(budget.seconds_for(2, None), 28);
        assert_eq!(budget.seconds_for(8, None), 16);
        assert_eq!(budget.seconds_for(9, None), 15);
        assert_eq!(budget.seconds_for(40, None), 15);
    }

    #[test]
    fn odysseus_gets_floored_time_bonus() {
        let budget = TimeBudget::default();
        assert_eq!(budget.seconds_for(1, Some(Character::Odysseus)), 45);
        assert_eq!(budget.seconds_for(8, Some(Character::Odysseus)), 24);
        assert_eq!(budget.seconds_for(2, Some(Character::Odysseus)), 42);
        assert_eq!(budget.seconds_for(1, Some(Character::Athena)), 30);
    }

    #[test]
    fn difficulty_follows_level() {
        assert_eq!(difficulty_for_level(1), Difficulty::Easy);
        assert_eq!(difficulty_for_level(2), Difficulty::Medium);
        assert_eq!(difficulty_for_level(3), Difficulty::Medium);
        assert_eq!(difficulty_for_level(4), Difficulty::Hard);
    }

    #[test]
    fn stage_milestones_every_five_answers() {
        assert!(!reaches_stage_milestone(0));
        assert!(!reaches_stage_milestone(4));
        assert!(reaches_stage_milestone(5));
        assert!(reaches_stage_milestone(10));
        assert_eq!(stage_progress(7), 2);
    }

    #[test]
    fn time_budget_reads_partial_toml() {
        let budget: TimeBudget = toml::from_str("base_secs = 20").expect("partial budget");
        assert_eq!(budget.base_secs, 20);
        assert_eq!(budget.floor_secs, 15);
    }
}
