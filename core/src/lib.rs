#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hellas Quest engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`] values
//! describing player intent or elapsed time, the session executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that renderers and the persistence gateway react to.

use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Serialize};

mod countdown;

pub use countdown::{Countdown, CountdownStep, SlotTimers};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hellas Quest.";

/// Number of answer options attached to every question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Chooses the starting difficulty while the session is being set up.
    SelectDifficulty {
        /// Difficulty tier to draw questions from.
        difficulty: Difficulty,
    },
    /// Chooses which historical periods questions are drawn from.
    SelectCategory {
        /// Category filter applied to the question bank.
        category: CategoryFilter,
    },
    /// Chooses the hero whose bonus applies for the whole session.
    SelectCharacter {
        /// Hero selected by the player.
        character: Character,
    },
    /// Leaves the intro and presents the first question.
    StartSession,
    /// Answers the active question.
    SubmitAnswer {
        /// Index into the options in presentation order.
        option: usize,
    },
    /// Requests activation of a power-up.
    ActivatePowerUp {
        /// Power-up the player wants to use.
        kind: PowerUpKind,
    },
    /// Advances every running countdown by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Ends the running session immediately.
    EndSession,
    /// Resets the session to its initial state for another game.
    Restart {
        /// Lifetime totals reloaded from persistent storage.
        lifetime: LifetimeState,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Confirms the difficulty picked during setup.
    DifficultySelected {
        /// Selected difficulty.
        difficulty: Difficulty,
    },
    /// Confirms the category filter picked during setup.
    CategorySelected {
        /// Selected category filter.
        category: CategoryFilter,
    },
    /// Confirms the hero picked during setup.
    CharacterSelected {
        /// Selected hero.
        character: Character,
    },
    /// Reports that the quest began and character bonuses were applied.
    SessionStarted {
        /// Lives available at the start of the quest.
        lives: u32,
        /// Hint uses available at the start of the quest.
        hint_uses: u32,
    },
    /// Announces a new active question.
    QuestionPresented {
        /// Historical period the question belongs to.
        period: Period,
        /// Question text.
        text: String,
        /// Answer options in presentation order.
        options: Vec<String>,
        /// Seconds granted to answer.
        time_budget: u32,
    },
    /// Reports that the displayed countdown changed.
    TimeRemainingChanged {
        /// Whole seconds left to answer.
        remaining: u32,
        /// Whether the remaining time is low enough to warn the player.
        low_time: bool,
    },
    /// Confirms a correct answer and the points it earned.
    AnswerAccepted {
        /// Option chosen by the player.
        option: usize,
        /// Points awarded for the answer.
        points: u64,
        /// Score after the award.
        score: u64,
        /// Streak after the answer.
        streak: u32,
    },
    /// Reports a wrong answer or an expired countdown.
    AnswerRejected {
        /// Option chosen by the player, or `None` when time ran out.
        selected: Option<usize>,
        /// Option holding the correct answer.
        correct: usize,
        /// Lives left after the loss.
        lives: u32,
    },
    /// Reports the new lifetime number of correct answers.
    CorrectAnswerRecorded {
        /// Lifetime total of correct answers.
        total: u64,
    },
    /// Indicates that an armed double points bonus was spent.
    DoublePointsConsumed,
    /// Announces that the stage counter advanced.
    StageAdvanced {
        /// Stage reached.
        stage: u32,
    },
    /// Announces that the question pool was exhausted and the level advanced.
    LevelAdvanced {
        /// Level reached.
        level: u32,
        /// Difficulty derived from the new level.
        difficulty: Difficulty,
    },
    /// Confirms that a power-up was activated.
    PowerUpActivated {
        /// Power-up that was used.
        kind: PowerUpKind,
        /// Uses left after the activation.
        uses_left: u32,
    },
    /// Reports answer options disabled by a power-up.
    OptionsDisabled {
        /// Indices of the options that became disabled.
        options: Vec<usize>,
    },
    /// Reports that time was added to the running countdown.
    TimeExtended {
        /// Whole seconds left after the extension.
        remaining: u32,
    },
    /// Reports the remaining cooldown of a power-up.
    CooldownChanged {
        /// Power-up cooling down.
        kind: PowerUpKind,
        /// Whole seconds left on the cooldown.
        remaining: u32,
    },
    /// Announces that a power-up finished cooling down.
    PowerUpReady {
        /// Power-up that can be used again.
        kind: PowerUpKind,
    },
    /// Announces a newly unlocked achievement.
    AchievementUnlocked {
        /// Identifier of the achievement.
        id: AchievementId,
    },
    /// Reports that the session beat the stored high score.
    HighScoreRecorded {
        /// New high score.
        score: u64,
        /// Level reached when the high score was set.
        level: u32,
    },
    /// Announces that the session ended.
    GameOver {
        /// Final score.
        score: u64,
        /// Final level.
        level: u32,
        /// Best score on record, including this session.
        high_score: u64,
    },
    /// Confirms that the session returned to its initial state.
    SessionReset,
}

/// Phases of the session state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the player to pick a difficulty.
    #[default]
    DifficultySelect,
    /// Waiting for the player to pick a category.
    CategorySelect,
    /// Waiting for the player to pick a hero.
    CharacterSelect,
    /// Showing the hero's storyline before the quest begins.
    Intro,
    /// A question is on screen and its countdown is running.
    QuestionActive,
    /// The last answer is being shown before the next transition.
    Feedback,
    /// The session ended.
    GameOver,
}

impl Phase {
    /// Reports whether a quest is underway.
    #[must_use]
    pub const fn is_in_quest(self) -> bool {
        matches!(self, Self::QuestionActive | Self::Feedback)
    }
}

/// Difficulty tiers of the question bank.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Introductory questions.
    Easy,
    /// Intermediate questions.
    #[default]
    Medium,
    /// Expert questions.
    Hard,
}

impl Difficulty {
    /// Every difficulty in ascending order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Human readable name of the difficulty.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Historical period a question belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Minoans, Mycenaeans and the Dark Ages.
    Rise,
    /// Classical Athens and Sparta.
    Golden,
    /// Macedonian conquest and the Hellenistic world.
    Decline,
}

impl Period {
    /// Every period in chronological order.
    pub const ALL: [Self; 3] = [Self::Rise, Self::Golden, Self::Decline];

    /// Display name of the period.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Rise => "The Rise of Greece",
            Self::Golden => "Golden Age",
            Self::Decline => "Decline & Fall",
        }
    }
}

/// Category filter applied when drawing questions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    /// Questions from every period.
    #[default]
    All,
    /// Only questions about the rise of Greece.
    Rise,
    /// Only questions about the golden age.
    Golden,
    /// Only questions about the decline.
    Decline,
}

impl CategoryFilter {
    /// Every category filter in menu order.
    pub const ALL: [Self; 4] = [Self::All, Self::Rise, Self::Golden, Self::Decline];

    /// Periods covered by the filter.
    #[must_use]
    pub const fn periods(self) -> &'static [Period] {
        match self {
            Self::All => &Period::ALL,
            Self::Rise => &[Period::Rise],
            Self::Golden => &[Period::Golden],
            Self::Decline => &[Period::Decline],
        }
    }

    /// Human readable name of the filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Periods",
            Self::Rise => Period::Rise.display_name(),
            Self::Golden => Period::Golden.display_name(),
            Self::Decline => Period::Decline.display_name(),
        }
    }
}

/// Heroes the player can embody, each granting a static bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    /// Grants extra time on every question.
    Odysseus,
    /// Doubles the points of every correct answer.
    Heracles,
    /// Starts the quest with an extra life.
    Perseus,
    /// Starts the quest with an extra hint.
    Athena,
    /// Adds a streak bonus to every correct answer.
    Achilles,
}

impl Character {
    /// Every hero in menu order.
    pub const ALL: [Self; 5] = [
        Self::Odysseus,
        Self::Heracles,
        Self::Perseus,
        Self::Athena,
        Self::Achilles,
    ];

    /// Name of the hero.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Odysseus => "Odysseus",
            Self::Heracles => "Heracles",
            Self::Perseus => "Perseus",
            Self::Athena => "Athena",
            Self::Achilles => "Achilles",
        }
    }

    /// Name of the hero's ability.
    #[must_use]
    pub const fn ability(self) -> &'static str {
        match self {
            Self::Odysseus => "Cunning Wisdom",
            Self::Heracles => "Divine Strength",
            Self::Perseus => "Quick Reflexes",
            Self::Athena => "Goddess of Wisdom",
            Self::Achilles => "Warrior's Valor",
        }
    }

    /// Short description of the hero's bonus.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Odysseus => "Get 50% time bonus on questions",
            Self::Heracles => "Double points for correct answers",
            Self::Perseus => "Start with 1 extra life",
            Self::Athena => "Get 1 extra hint use",
            Self::Achilles => "Double streak bonuses",
        }
    }

    /// Question time expressed as a percentage of the base budget.
    #[must_use]
    pub const fn time_bonus_percent(self) -> u32 {
        match self {
            Self::Odysseus => 150,
            _ => 100,
        }
    }

    /// Multiplier applied to the points of a correct answer.
    #[must_use]
    pub const fn points_multiplier(self) -> u64 {
        match self {
            Self::Heracles => 2,
            _ => 1,
        }
    }

    /// Lives added once when the quest starts.
    #[must_use]
    pub const fn extra_lives(self) -> u32 {
        match self {
            Self::Perseus => 1,
            _ => 0,
        }
    }

    /// Hint uses added once when the quest starts.
    #[must_use]
    pub const fn extra_hints(self) -> u32 {
        match self {
            Self::Athena => 1,
            _ => 0,
        }
    }

    /// Points added per streak step after all multipliers.
    #[must_use]
    pub const fn streak_bonus_per_step(self) -> u64 {
        match self {
            Self::Achilles => 20,
            _ => 0,
        }
    }
}

/// The four power-ups available during a quest.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    /// Disables half of the wrong options.
    Hint,
    /// Disables every wrong option.
    Strike,
    /// Adds time to the running countdown.
    TimeFreeze,
    /// Doubles the points of the next correct answer.
    DoublePoints,
}

impl PowerUpKind {
    /// Every power-up in button order.
    pub const ALL: [Self; 4] = [
        Self::Hint,
        Self::Strike,
        Self::TimeFreeze,
        Self::DoublePoints,
    ];

    /// Button label of the power-up.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hint => "Hint",
            Self::Strike => "Strike",
            Self::TimeFreeze => "Time Freeze",
            Self::DoublePoints => "Double Points",
        }
    }
}

/// Identifiers of every achievement; the serialized form is the stored id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum AchievementId {
    /// First correct answer.
    FirstAnswer,
    /// Ten correct answers.
    TenAnswers,
    /// Twenty-five correct answers.
    TwentyFiveAnswers,
    /// Fifty correct answers.
    FiftyAnswers,
    /// Streak of five.
    PerfectStreak5,
    /// Streak of ten.
    PerfectStreak10,
    /// Reached level three.
    Level3,
    /// Reached level five.
    Level5,
    /// Scored one thousand points.
    HighScore1000,
    /// Scored five thousand points.
    HighScore5000,
    /// Used every power-up in one game.
    AllPowerUpsUsed,
}

/// Per-game record of which power-ups were used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PowerUpUsage {
    /// Whether a hint was used.
    pub hint: bool,
    /// Whether a strike was used.
    pub strike: bool,
    /// Whether a time freeze was used.
    pub time_freeze: bool,
    /// Whether double points was armed.
    pub double_points: bool,
}

impl PowerUpUsage {
    /// Records that `kind` was used.
    pub fn mark(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Hint => self.hint = true,
            PowerUpKind::Strike => self.strike = true,
            PowerUpKind::TimeFreeze => self.time_freeze = true,
            PowerUpKind::DoublePoints => self.double_points = true,
        }
    }

    /// Reports whether `kind` was used.
    #[must_use]
    pub const fn has_used(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Hint => self.hint,
            PowerUpKind::Strike => self.strike,
            PowerUpKind::TimeFreeze => self.time_freeze,
            PowerUpKind::DoublePoints => self.double_points,
        }
    }

    /// Reports whether every power-up was used.
    #[must_use]
    pub const fn all_used(&self) -> bool {
        self.hint && self.strike && self.time_freeze && self.double_points
    }
}

/// Progress accumulated across sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeState {
    /// Correct answers given across every session.
    pub total_correct_answers: u64,
    /// Achievements unlocked so far.
    pub achievements: BTreeSet<AchievementId>,
    /// Best score on record.
    pub high_score: u64,
    /// Level reached when the high score was set.
    pub high_score_level: u32,
    /// Power-ups used in the current game.
    pub power_ups_used: PowerUpUsage,
}

/// Multiple-choice question with exactly four distinct options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    period: Period,
    text: String,
    options: [String; OPTIONS_PER_QUESTION],
    correct: usize,
}

impl Question {
    /// Creates a question whose correct answer is `options[correct]`.
    ///
    /// Returns `None` when the index is out of range or options repeat.
    #[must_use]
    pub fn new(
        period: Period,
        text: impl Into<String>,
        options: [String; OPTIONS_PER_QUESTION],
        correct: usize,
    ) -> Option<Self> {
        if correct >= OPTIONS_PER_QUESTION {
            return None;
        }
        let distinct: BTreeSet<&str> = options.iter().map(String::as_str).collect();
        if distinct.len() != OPTIONS_PER_QUESTION {
            return None;
        }
        Some(Self {
            period,
            text: text.into(),
            options,
            correct,
        })
    }

    /// Period the question belongs to.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Question text, which also identifies the question.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Answer options in authored order.
    #[must_use]
    pub fn options(&self) -> &[String; OPTIONS_PER_QUESTION] {
        &self.options
    }

    /// Correct answer text.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct]
    }

    /// Reports whether `answer` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer() == answer
    }
}

/// Read-only view of an answer option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionView {
    /// Answer text.
    pub text: String,
    /// Whether the option was disabled by a power-up.
    pub disabled: bool,
}

/// Read-only view of the active question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
    /// Period the question belongs to.
    pub period: Period,
    /// Question text.
    pub text: String,
    /// Options in presentation order.
    pub options: Vec<OptionView>,
}

/// Read-only state of a power-up button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUpButton {
    /// Power-up driven by the button.
    pub kind: PowerUpKind,
    /// Uses left.
    pub uses: u32,
    /// Whole seconds of cooldown left.
    pub cooldown_secs: u32,
    /// Whether the power-up is armed and waiting to be consumed.
    pub active: bool,
    /// Whether pressing the button would activate the power-up.
    pub enabled: bool,
}

/// Read-only snapshot of the numbers shown on the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Current score.
    pub score: u64,
    /// Lives left.
    pub lives: u32,
    /// Consecutive correct answers.
    pub streak: u32,
    /// Current level.
    pub level: u32,
    /// Current stage.
    pub stage: u32,
    /// Active difficulty.
    pub difficulty: Difficulty,
    /// Active category filter.
    pub category: CategoryFilter,
    /// Selected hero.
    pub character: Option<Character>,
    /// Whole seconds left on the question countdown.
    pub time_remaining: u32,
    /// Whether the countdown is low enough to warn the player.
    pub low_time: bool,
    /// Correct answers toward the next streak stage, out of five.
    pub stage_progress: u32,
    /// Best score on record.
    pub high_score: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: [&str; 4]) -> [String; 4] {
        values.map(str::to_owned)
    }

    #[test]
    fn question_rejects_out_of_range_answer() {
        let question = Question::new(Period::Rise, "Q", options(["a", "b", "c", "d"]), 4);
        assert!(question.is_none());
    }

    #[test]
    fn question_rejects_repeated_options() {
        let question = Question::new(Period::Rise, "Q", options(["a", "b", "a", "d"]), 0);
        assert!(question.is_none());
    }

    #[test]
    fn question_reports_correct_answer() {
        let question = Question::new(
            Period::Golden,
            "Who wrote the Histories?",
            options(["Thucydides", "Herodotus", "Xenophon", "Plato"]),
            1,
        )
        .expect("valid question");
        assert_eq!(question.correct_answer(), "Herodotus");
        assert!(question.is_correct("Herodotus"));
        assert!(!question.is_correct("Plato"));
    }

    #[test]
    fn all_filter_covers_every_period() {
        assert_eq!(CategoryFilter::All.periods(), &Period::ALL);
        assert_eq!(CategoryFilter::Decline.periods(), &[Period::Decline]);
    }

    #[test]
    fn character_bonuses_match_heroes() {
        assert_eq!(Character::Odysseus.time_bonus_percent(), 150);
        assert_eq!(Character::Heracles.points_multiplier(), 2);
        assert_eq!(Character::Perseus.extra_lives(), 1);
        assert_eq!(Character::Athena.extra_hints(), 1);
        assert_eq!(Character::Achilles.streak_bonus_per_step(), 20);

        for character in Character::ALL {
            if character != Character::Heracles {
                assert_eq!(character.points_multiplier(), 1);
            }
        }
    }

    #[test]
    fn achievement_ids_serialize_to_stored_names() {
        let ids = vec![
            AchievementId::FirstAnswer,
            AchievementId::PerfectStreak10,
            AchievementId::Level3,
            AchievementId::AllPowerUpsUsed,
        ];
        let json = serde_json::to_string(&ids).expect("serialize ids");
        assert_eq!(
            json,
            r#"["firstAnswer","perfectStreak10","level3","allPowerUpsUsed"]"#
        );
    }

    #[test]
    fn power_up_usage_uses_stored_field_names() {
        let mut usage = PowerUpUsage::default();
        usage.mark(PowerUpKind::TimeFreeze);
        let json = serde_json::to_string(&usage).expect("serialize usage");
        assert_eq!(
            json,
            r#"{"hint":false,"strike":false,"timeFreeze":true,"doublePoints":false}"#
        );

        let partial: PowerUpUsage =
            serde_json::from_str(r#"{"hint":true}"#).expect("missing flags default");
        assert!(partial.has_used(PowerUpKind::Hint));
        assert!(!partial.all_used());
    }
}
