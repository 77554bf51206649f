#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative quiz session for Hellas Quest.
//!
//! The session owns every mutable piece of a play-through. Adapters mutate it
//! exclusively through [`apply`] and observe it through [`query`] and the
//! emitted [`Event`] values. Time only moves through [`Command::Tick`], which
//! keeps a session fully reproducible from its seed and command script.

mod config;

pub use config::{ConfigError, SessionConfig};

use std::{collections::BTreeSet, time::Duration};

use hellas_quest_core::{
    CategoryFilter, Character, Command, Difficulty, Event, LifetimeState, Period, Phase,
    PowerUpKind, PowerUpUsage, Question, SlotTimers, WELCOME_BANNER,
};
use hellas_quest_system_achievements::{self as achievements, Progress};
use hellas_quest_system_power_ups::{hint_targets, strike_targets, OptionState, PowerUps};
use hellas_quest_system_question_bank::QuestionBank;
use hellas_quest_system_scoring::{self as scoring, ScoreInputs};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionTimer {
    Question,
    Feedback,
}

/// Question as presented to the player, with shuffled options.
#[derive(Clone, Debug)]
struct PresentedQuestion {
    period: Period,
    text: String,
    options: Vec<String>,
    correct: usize,
    disabled: Vec<bool>,
}

impl PresentedQuestion {
    fn new(question: &Question, rng: &mut ChaCha8Rng) -> Self {
        let mut options: Vec<String> = question
            .options()
            .iter()
            .filter(|option| !question.is_correct(option))
            .cloned()
            .collect();
        options.shuffle(rng);
        let correct = rng.gen_range(0..=options.len());
        options.insert(correct, question.correct_answer().to_owned());

        Self {
            period: question.period(),
            text: question.text().to_owned(),
            disabled: vec![false; options.len()],
            options,
            correct,
        }
    }

    fn is_selectable(&self, option: usize) -> bool {
        self.disabled.get(option).is_some_and(|disabled| !disabled)
    }

    fn option_states(&self) -> Vec<OptionState> {
        self.disabled
            .iter()
            .enumerate()
            .map(|(index, disabled)| OptionState {
                correct: index == self.correct,
                disabled: *disabled,
            })
            .collect()
    }

    fn disable(&mut self, targets: &[usize]) {
        for target in targets {
            if let Some(disabled) = self.disabled.get_mut(*target) {
                *disabled = true;
            }
        }
    }
}

/// Complete state of one player's quiz, from setup to game over.
#[derive(Debug)]
pub struct Session {
    banner: &'static str,
    config: SessionConfig,
    bank: QuestionBank,
    rng: ChaCha8Rng,
    phase: Phase,
    score: u64,
    lives: u32,
    streak: u32,
    level: u32,
    stage: u32,
    difficulty: Difficulty,
    category: CategoryFilter,
    character: Option<Character>,
    answered: BTreeSet<String>,
    current: Option<PresentedQuestion>,
    time_remaining: u32,
    power_ups: PowerUps,
    timers: SlotTimers<SessionTimer>,
    lifetime: LifetimeState,
}

impl Session {
    /// Creates a session waiting for the difficulty selection.
    ///
    /// `seed` drives question selection and option order.
    #[must_use]
    pub fn new(
        config: SessionConfig,
        bank: QuestionBank,
        lifetime: LifetimeState,
        seed: u64,
    ) -> Self {
        let mut session = Self {
            banner: WELCOME_BANNER,
            power_ups: PowerUps::new(config.power_ups),
            config,
            bank,
            rng: ChaCha8Rng::seed_from_u64(seed),
            phase: Phase::DifficultySelect,
            score: 0,
            lives: 0,
            streak: 0,
            level: 1,
            stage: 1,
            difficulty: Difficulty::default(),
            category: CategoryFilter::default(),
            character: None,
            answered: BTreeSet::new(),
            current: None,
            time_remaining: 0,
            timers: SlotTimers::new(),
            lifetime,
        };
        session.reset_game();
        session
    }

    fn reset_game(&mut self) {
        self.phase = Phase::DifficultySelect;
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.streak = 0;
        self.level = 1;
        self.stage = 1;
        self.difficulty = self.config.default_difficulty;
        self.category = self.config.default_category;
        self.character = None;
        self.answered.clear();
        self.current = None;
        self.time_remaining = self.config.time_budget.seconds_for(1, None);
        self.power_ups = PowerUps::new(self.config.power_ups);
        self.timers.clear();
    }

    fn enter_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn in_phase(&self, expected: Phase, action: &str) -> bool {
        if self.phase == expected {
            return true;
        }
        debug!(action, phase = ?self.phase, "ignoring command outside its phase");
        false
    }

    fn select_difficulty(&mut self, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        if !self.in_phase(Phase::DifficultySelect, "select difficulty") {
            return;
        }
        self.difficulty = difficulty;
        out_events.push(Event::DifficultySelected { difficulty });
        self.enter_phase(Phase::CategorySelect, out_events);
    }

    fn select_category(&mut self, category: CategoryFilter, out_events: &mut Vec<Event>) {
        if !self.in_phase(Phase::CategorySelect, "select category") {
            return;
        }
        self.category = category;
        out_events.push(Event::CategorySelected { category });
        self.enter_phase(Phase::CharacterSelect, out_events);
    }

    fn select_character(&mut self, character: Character, out_events: &mut Vec<Event>) {
        if !self.in_phase(Phase::CharacterSelect, "select character") {
            return;
        }
        self.character = Some(character);
        out_events.push(Event::CharacterSelected { character });
        self.enter_phase(Phase::Intro, out_events);
    }

    fn start_session(&mut self, out_events: &mut Vec<Event>) {
        if !self.in_phase(Phase::Intro, "start session") {
            return;
        }

        let extra_lives = self.character.map_or(0, Character::extra_lives);
        let extra_hints = self.character.map_or(0, Character::extra_hints);
        self.lives = self.config.starting_lives.saturating_add(extra_lives);
        self.power_ups = PowerUps::new(self.config.power_ups);
        self.power_ups.grant(PowerUpKind::Hint, extra_hints);
        self.lifetime.power_ups_used = PowerUpUsage::default();

        info!(
            character = ?self.character,
            difficulty = ?self.difficulty,
            category = ?self.category,
            "quest started"
        );
        out_events.push(Event::SessionStarted {
            lives: self.lives,
            hint_uses: self.power_ups.uses(PowerUpKind::Hint),
        });
        self.load_next_question(out_events);
    }

    fn draw_question(&mut self) -> Option<Question> {
        self.bank
            .available_questions(self.category, self.difficulty, &self.answered, &mut self.rng)
            .into_iter()
            .next()
            .cloned()
    }

    fn load_next_question(&mut self, out_events: &mut Vec<Event>) {
        self.current = None;

        let mut next = self.draw_question();
        if next.is_none() {
            self.advance_level(out_events);
            next = self.draw_question();
        }
        let Some(question) = next else {
            info!(level = self.level, "no questions left for the active filter");
            self.end_session(out_events);
            return;
        };

        let presented = PresentedQuestion::new(&question, &mut self.rng);
        let budget = self.config.time_budget.seconds_for(self.level, self.character);
        self.time_remaining = budget;
        self.timers
            .start(SessionTimer::Question, Duration::from_secs(u64::from(budget)));

        out_events.push(Event::QuestionPresented {
            period: presented.period,
            text: presented.text.clone(),
            options: presented.options.clone(),
            time_budget: budget,
        });
        self.current = Some(presented);
        self.enter_phase(Phase::QuestionActive, out_events);
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        self.level = self.level.saturating_add(1);
        self.stage = self.stage.saturating_add(1);
        self.answered.clear();
        self.difficulty = scoring::difficulty_for_level(self.level);

        info!(level = self.level, difficulty = ?self.difficulty, "level advanced");
        out_events.push(Event::LevelAdvanced {
            level: self.level,
            difficulty: self.difficulty,
        });
        out_events.push(Event::StageAdvanced { stage: self.stage });
        self.check_achievements(out_events);
    }

    fn submit_answer(&mut self, option: usize, out_events: &mut Vec<Event>) {
        if !self.in_phase(Phase::QuestionActive, "submit answer") {
            return;
        }
        let Some(question) = self.current.as_ref() else {
            return;
        };
        if !question.is_selectable(option) {
            debug!(option, "ignoring unavailable answer option");
            return;
        }

        let correct = question.correct;
        let text = question.text.clone();
        self.time_remaining = self.timers.whole_seconds(SessionTimer::Question);
        self.timers.cancel(SessionTimer::Question);

        if option == correct {
            self.accept_answer(option, text, out_events);
        } else {
            self.lose_life(Some(option), correct, out_events);
        }
    }

    fn accept_answer(&mut self, option: usize, text: String, out_events: &mut Vec<Event>) {
        self.streak = self.streak.saturating_add(1);
        self.lifetime.total_correct_answers = self.lifetime.total_correct_answers.saturating_add(1);
        out_events.push(Event::CorrectAnswerRecorded {
            total: self.lifetime.total_correct_answers,
        });
        let _ = self.answered.insert(text);

        let double_points = self.power_ups.consume_double_points();
        let points = scoring::points_for_correct_answer(&ScoreInputs {
            level: self.level,
            streak: self.streak,
            time_remaining: self.time_remaining,
            character: self.character,
            double_points,
        });
        self.score = self.score.saturating_add(points);

        out_events.push(Event::AnswerAccepted {
            option,
            points,
            score: self.score,
            streak: self.streak,
        });
        if double_points {
            out_events.push(Event::DoublePointsConsumed);
        }
        if scoring::reaches_stage_milestone(self.streak) {
            self.stage = self.stage.saturating_add(1);
            out_events.push(Event::StageAdvanced { stage: self.stage });
        }

        self.check_achievements(out_events);
        self.begin_feedback(true, out_events);
    }

    fn lose_life(&mut self, selected: Option<usize>, correct: usize, out_events: &mut Vec<Event>) {
        self.lives = self.lives.saturating_sub(1);
        self.streak = 0;
        out_events.push(Event::AnswerRejected {
            selected,
            correct,
            lives: self.lives,
        });
        self.begin_feedback(false, out_events);
    }

    fn begin_feedback(&mut self, correct: bool, out_events: &mut Vec<Event>) {
        self.enter_phase(Phase::Feedback, out_events);
        let delay = self.config.feedback_delay(correct);
        if delay.is_zero() {
            self.finish_feedback(out_events);
        } else {
            self.timers.start(SessionTimer::Feedback, delay);
        }
    }

    fn finish_feedback(&mut self, out_events: &mut Vec<Event>) {
        if self.lives == 0 {
            self.end_session(out_events);
        } else {
            self.load_next_question(out_events);
        }
    }

    fn expire_question(&mut self, out_events: &mut Vec<Event>) {
        let Some(question) = self.current.as_ref() else {
            return;
        };
        let correct = question.correct;
        self.time_remaining = 0;
        debug!(level = self.level, "question countdown expired");
        self.lose_life(None, correct, out_events);
    }

    fn activate_power_up(&mut self, kind: PowerUpKind, out_events: &mut Vec<Event>) {
        let allowed = match kind {
            PowerUpKind::DoublePoints => self.phase.is_in_quest(),
            _ => self.phase == Phase::QuestionActive,
        };
        if !allowed {
            debug!(?kind, phase = ?self.phase, "ignoring power-up outside an active question");
            return;
        }
        if !self.power_ups.try_activate(kind) {
            debug!(?kind, "power-up unavailable");
            return;
        }

        out_events.push(Event::PowerUpActivated {
            kind,
            uses_left: self.power_ups.uses(kind),
        });
        match kind {
            PowerUpKind::Hint => self.disable_options(hint_targets, out_events),
            PowerUpKind::Strike => self.disable_options(strike_targets, out_events),
            PowerUpKind::TimeFreeze => {
                let bonus = Duration::from_secs(u64::from(self.config.time_freeze_bonus_secs));
                if let Some(remaining) = self.timers.extend(SessionTimer::Question, bonus) {
                    self.time_remaining = remaining;
                    out_events.push(Event::TimeExtended { remaining });
                }
            }
            PowerUpKind::DoublePoints => {}
        }

        let cooldown = self.power_ups.cooldown_secs(kind);
        if cooldown > 0 {
            out_events.push(Event::CooldownChanged {
                kind,
                remaining: cooldown,
            });
        }

        self.lifetime.power_ups_used.mark(kind);
        self.check_achievements(out_events);
    }

    fn disable_options(
        &mut self,
        select: fn(&[OptionState]) -> Vec<usize>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(question) = self.current.as_mut() else {
            return;
        };
        let targets = select(&question.option_states());
        question.disable(&targets);
        if !targets.is_empty() {
            out_events.push(Event::OptionsDisabled { options: targets });
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.power_ups.advance(dt, out_events);

        let low_time_secs = self.config.low_time_secs;
        let mut fired = None;
        self.timers.advance(dt, |timer, step| {
            if timer == SessionTimer::Question && step.seconds_changed {
                out_events.push(Event::TimeRemainingChanged {
                    remaining: step.remaining_secs,
                    low_time: step.remaining_secs <= low_time_secs,
                });
            }
            if step.expired {
                fired = Some(timer);
            }
        });

        if self.phase == Phase::QuestionActive {
            self.time_remaining = self.timers.whole_seconds(SessionTimer::Question);
        }
        match fired {
            Some(SessionTimer::Question) => self.expire_question(out_events),
            Some(SessionTimer::Feedback) => self.finish_feedback(out_events),
            None => {}
        }
    }

    fn end_session(&mut self, out_events: &mut Vec<Event>) {
        self.timers.clear();
        self.power_ups.stop_cooldowns();
        self.current = None;

        if self.score > self.lifetime.high_score {
            self.lifetime.high_score = self.score;
            self.lifetime.high_score_level = self.level;
            out_events.push(Event::HighScoreRecorded {
                score: self.score,
                level: self.level,
            });
        }

        info!(score = self.score, level = self.level, "game over");
        out_events.push(Event::GameOver {
            score: self.score,
            level: self.level,
            high_score: self.lifetime.high_score,
        });
        self.enter_phase(Phase::GameOver, out_events);
    }

    fn restart(&mut self, lifetime: LifetimeState, out_events: &mut Vec<Event>) {
        self.lifetime = lifetime;
        self.lifetime.power_ups_used = PowerUpUsage::default();
        self.reset_game();
        out_events.push(Event::SessionReset);
        out_events.push(Event::PhaseChanged { phase: self.phase });
    }

    fn check_achievements(&mut self, out_events: &mut Vec<Event>) {
        let progress = Progress {
            score: self.score,
            streak: self.streak,
            level: self.level,
        };
        for id in achievements::evaluate(&progress, &self.lifetime) {
            let _ = self.lifetime.achievements.insert(id);
            info!(?id, "achievement unlocked");
            out_events.push(Event::AchievementUnlocked { id });
        }
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectDifficulty { difficulty } => {
            session.select_difficulty(difficulty, out_events);
        }
        Command::SelectCategory { category } => session.select_category(category, out_events),
        Command::SelectCharacter { character } => {
            session.select_character(character, out_events);
        }
        Command::StartSession => session.start_session(out_events),
        Command::SubmitAnswer { option } => session.submit_answer(option, out_events),
        Command::ActivatePowerUp { kind } => session.activate_power_up(kind, out_events),
        Command::Tick { dt } => session.tick(dt, out_events),
        Command::EndSession => {
            if session.phase.is_in_quest() {
                session.end_session(out_events);
            } else {
                debug!(phase = ?session.phase, "ignoring end of session outside a quest");
            }
        }
        Command::Restart { lifetime } => session.restart(lifetime, out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::collections::BTreeSet;

    use hellas_quest_core::{
        HudSnapshot, LifetimeState, OptionView, Phase, PowerUpButton, QuestionView,
    };
    use hellas_quest_system_scoring as scoring;

    use super::{Session, SessionConfig, SessionTimer};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(session: &Session) -> &'static str {
        session.banner
    }

    /// Current phase of the session.
    #[must_use]
    pub fn phase(session: &Session) -> Phase {
        session.phase
    }

    /// Captures the values shown on the heads-up display.
    #[must_use]
    pub fn hud(session: &Session) -> HudSnapshot {
        let question_running = session.phase == Phase::QuestionActive;
        let time_remaining = if question_running {
            session.timers.whole_seconds(SessionTimer::Question)
        } else {
            session.time_remaining
        };
        HudSnapshot {
            phase: session.phase,
            score: session.score,
            lives: session.lives,
            streak: session.streak,
            level: session.level,
            stage: session.stage,
            difficulty: session.difficulty,
            category: session.category,
            character: session.character,
            time_remaining,
            low_time: question_running && time_remaining <= session.config.low_time_secs,
            stage_progress: scoring::stage_progress(session.streak),
            high_score: session.lifetime.high_score,
        }
    }

    /// Captures the question on screen, if any.
    #[must_use]
    pub fn current_question(session: &Session) -> Option<QuestionView> {
        session.current.as_ref().map(|question| QuestionView {
            period: question.period,
            text: question.text.clone(),
            options: question
                .options
                .iter()
                .zip(&question.disabled)
                .map(|(text, disabled)| OptionView {
                    text: text.clone(),
                    disabled: *disabled,
                })
                .collect(),
        })
    }

    /// Index of the correct option of the question on screen.
    #[must_use]
    pub fn correct_option(session: &Session) -> Option<usize> {
        session.current.as_ref().map(|question| question.correct)
    }

    /// Captures the state of every power-up button.
    #[must_use]
    pub fn power_up_buttons(session: &Session) -> Vec<PowerUpButton> {
        session.power_ups.buttons()
    }

    /// Lifetime totals as mirrored by the session.
    #[must_use]
    pub fn lifetime(session: &Session) -> &LifetimeState {
        &session.lifetime
    }

    /// Texts of the questions answered correctly at the current level.
    #[must_use]
    pub fn answered_questions(session: &Session) -> &BTreeSet<String> {
        &session.answered
    }

    /// Rules the session was created with.
    #[must_use]
    pub fn config(session: &Session) -> &SessionConfig {
        &session.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> Question {
        Question::new(
            Period::Golden,
            text,
            ["Pericles", "Solon", "Cleisthenes", "Draco"].map(str::to_owned),
            2,
        )
        .expect("valid question")
    }

    #[test]
    fn presented_options_keep_correct_answer_index() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..32 {
            let presented = PresentedQuestion::new(&question("Father of democracy?"), &mut rng);
            assert_eq!(presented.options.len(), 4);
            assert_eq!(presented.options[presented.correct], "Cleisthenes");
            let distinct: BTreeSet<&String> = presented.options.iter().collect();
            assert_eq!(distinct.len(), 4);
        }
    }

    #[test]
    fn disabled_options_cannot_be_selected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut presented = PresentedQuestion::new(&question("Q"), &mut rng);
        let wrong = (presented.correct + 1) % 4;
        presented.disable(&[wrong]);

        assert!(!presented.is_selectable(wrong));
        assert!(presented.is_selectable(presented.correct));
        assert!(!presented.is_selectable(4));
    }

    #[test]
    fn new_session_waits_for_difficulty() {
        let bank = QuestionBank::builtin().expect("builtin bank");
        let session = Session::new(SessionConfig::default(), bank, LifetimeState::default(), 0);
        assert_eq!(query::phase(&session), Phase::DifficultySelect);
        assert_eq!(query::hud(&session).lives, 3);
        assert_eq!(query::welcome_banner(&session), WELCOME_BANNER);
    }
}
