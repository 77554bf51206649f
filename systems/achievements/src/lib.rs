#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Achievement table and evaluator.
//!
//! Each achievement is a plain predicate over the running game and the lifetime
//! totals. Evaluation never mutates anything; the caller records the returned
//! ids.

use hellas_quest_core::{AchievementId, LifetimeState};

/// Running game values consulted by achievement predicates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Current score.
    pub score: u64,
    /// Current streak.
    pub streak: u32,
    /// Current level.
    pub level: u32,
}

/// Static description of an achievement.
#[derive(Clone, Copy, Debug)]
pub struct Achievement {
    /// Stored identifier.
    pub id: AchievementId,
    /// Title shown in the unlock pop-up.
    pub title: &'static str,
    /// Description shown in the unlock pop-up.
    pub description: &'static str,
    /// Emoji shown next to the title.
    pub icon: &'static str,
    /// Predicate that unlocks the achievement.
    pub check: fn(&Progress, &LifetimeState) -> bool,
}

/// Every achievement in evaluation order.
pub static ACHIEVEMENTS: [Achievement; 11] = [
    Achievement {
        id: AchievementId::FirstAnswer,
        title: "First Steps",
        description: "Answered your first question correctly!",
        icon: "🎯",
        check: |_, lifetime| lifetime.total_correct_answers >= 1,
    },
    Achievement {
        id: AchievementId::TenAnswers,
        title: "Scholar",
        description: "Answered 10 questions correctly!",
        icon: "📚",
        check: |_, lifetime| lifetime.total_correct_answers >= 10,
    },
    Achievement {
        id: AchievementId::TwentyFiveAnswers,
        title: "Historian",
        description: "Answered 25 questions correctly!",
        icon: "🏛️",
        check: |_, lifetime| lifetime.total_correct_answers >= 25,
    },
    Achievement {
        id: AchievementId::FiftyAnswers,
        title: "Master Historian",
        description: "Answered 50 questions correctly!",
        icon: "👑",
        check: |_, lifetime| lifetime.total_correct_answers >= 50,
    },
    Achievement {
        id: AchievementId::PerfectStreak5,
        title: "On Fire!",
        description: "Achieved a 5-question streak!",
        icon: "🔥",
        check: |progress, _| progress.streak >= 5 && progress.streak % 5 == 0,
    },
    Achievement {
        id: AchievementId::PerfectStreak10,
        title: "Unstoppable!",
        description: "Achieved a 10-question streak!",
        icon: "⚡",
        check: |progress, _| progress.streak >= 10 && progress.streak % 10 == 0,
    },
    Achievement {
        id: AchievementId::Level3,
        title: "Rising Star",
        description: "Reached Level 3!",
        icon: "⭐",
        check: |progress, _| progress.level >= 3,
    },
    Achievement {
        id: AchievementId::Level5,
        title: "Legend",
        description: "Reached Level 5!",
        icon: "🌟",
        check: |progress, _| progress.level >= 5,
    },
    Achievement {
        id: AchievementId::HighScore1000,
        title: "High Achiever",
        description: "Scored over 1,000 points!",
        icon: "💯",
        check: |progress, _| progress.score >= 1000,
    },
    Achievement {
        id: AchievementId::HighScore5000,
        title: "Elite Player",
        description: "Scored over 5,000 points!",
        icon: "💎",
        check: |progress, _| progress.score >= 5000,
    },
    Achievement {
        id: AchievementId::AllPowerUpsUsed,
        title: "Strategic Master",
        description: "Used all power-up types in one game!",
        icon: "🎲",
        check: |_, lifetime| lifetime.power_ups_used.all_used(),
    },
];

/// Looks up the static description of `id`.
#[must_use]
pub fn achievement(id: AchievementId) -> &'static Achievement {
    let index = match id {
        AchievementId::FirstAnswer => 0,
        AchievementId::TenAnswers => 1,
        AchievementId::TwentyFiveAnswers => 2,
        AchievementId::FiftyAnswers => 3,
        AchievementId::PerfectStreak5 => 4,
        AchievementId::PerfectStreak10 => 5,
        AchievementId::Level3 => 6,
        AchievementId::Level5 => 7,
        AchievementId::HighScore1000 => 8,
        AchievementId::HighScore5000 => 9,
        AchievementId::AllPowerUpsUsed => 10,
    };
    &ACHIEVEMENTS[index]
}

/// Returns the achievements that hold now and are not yet unlocked.
#[must_use]
pub fn evaluate(progress: &Progress, lifetime: &LifetimeState) -> Vec<AchievementId> {
    ACHIEVEMENTS
        .iter()
        .filter(|achievement| !lifetime.achievements.contains(&achievement.id))
        .filter(|achievement| (achievement.check)(progress, lifetime))
        .map(|achievement| achievement.id)
        .collect()
}
