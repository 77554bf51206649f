#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hellas Quest adapters.
//!
//! A [`Scene`] is rebuilt from session snapshots every frame and enriched with
//! transient content derived from events: feedback messages, achievement
//! pop-ups, the hero storyline and the game-over summary. Backends only read
//! the scene and report [`FrameInput`].

mod text;

pub use text::{ability_line, power_up_label, storyline, HudText, STAGE_PROGRESS_SLOTS};

use std::time::Duration;

use anyhow::Result as AnyResult;
use hellas_quest_core::{
    AchievementId, CategoryFilter, Character, Difficulty, Event, HudSnapshot, PowerUpButton,
    PowerUpKind, QuestionView,
};
use hellas_quest_system_achievements as achievements;

/// How long a feedback message stays visible.
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// How long an achievement pop-up stays visible, including its fade-out.
pub const POPUP_DURATION: Duration = Duration::from_millis(4500);

/// Visual tone of a feedback message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Positive outcome.
    Success,
    /// Lost life or other setback.
    Error,
}

/// Short-lived message reacting to the last player action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackMessage {
    /// Message text.
    pub text: String,
    /// Visual tone.
    pub tone: Tone,
    /// Time left before the message disappears.
    pub remaining: Duration,
}

impl FeedbackMessage {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            remaining: FEEDBACK_DURATION,
        }
    }
}

/// Pop-up announcing an unlocked achievement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchievementPopup {
    /// Unlocked achievement.
    pub id: AchievementId,
    /// Emoji icon.
    pub icon: &'static str,
    /// Title.
    pub title: &'static str,
    /// Description.
    pub description: &'static str,
    /// Time left before the pop-up disappears.
    pub remaining: Duration,
}

/// Highlight of the answered question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerReveal {
    /// Option holding the correct answer.
    pub correct: usize,
    /// Option picked by the player, or `None` when time ran out.
    pub selected: Option<usize>,
}

/// Hero introduction shown before the quest starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntroText {
    /// Storyline paragraph.
    pub storyline: String,
    /// Ability line.
    pub ability: String,
}

/// Final numbers shown once the game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    /// Final score.
    pub score: u64,
    /// Final level.
    pub level: u32,
    /// Best score on record.
    pub high_score: u64,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Heads-up display values.
    pub hud: HudSnapshot,
    /// Question on screen.
    pub question: Option<QuestionView>,
    /// Power-up buttons in display order.
    pub power_ups: Vec<PowerUpButton>,
    /// Highlight of the last answer while feedback is shown.
    pub reveal: Option<AnswerReveal>,
    /// Visible feedback messages, oldest first.
    pub feedback: Vec<FeedbackMessage>,
    /// Visible achievement pop-ups, oldest first.
    pub popups: Vec<AchievementPopup>,
    /// Hero introduction, while the quest has not started.
    pub intro: Option<IntroText>,
    /// Game-over summary, once the game ended.
    pub game_over: Option<GameOverSummary>,
}

impl Scene {
    /// Creates a scene showing only the provided HUD.
    #[must_use]
    pub fn new(hud: HudSnapshot) -> Self {
        Self {
            hud,
            question: None,
            power_ups: Vec::new(),
            reveal: None,
            feedback: Vec::new(),
            popups: Vec::new(),
            intro: None,
            game_over: None,
        }
    }

    /// Replaces the snapshot-driven parts of the scene.
    pub fn sync(
        &mut self,
        hud: HudSnapshot,
        question: Option<QuestionView>,
        power_ups: Vec<PowerUpButton>,
    ) {
        self.hud = hud;
        self.question = question;
        self.power_ups = power_ups;
    }

    /// Derives transient content from session events.
    pub fn absorb(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::CharacterSelected { character } => {
                    self.intro = Some(IntroText {
                        storyline: storyline(*character),
                        ability: ability_line(*character),
                    });
                }
                Event::SessionStarted { .. } => {
                    self.intro = None;
                    self.game_over = None;
                }
                Event::QuestionPresented { .. } => self.reveal = None,
                Event::AnswerAccepted { option, points, .. } => {
                    self.reveal = Some(AnswerReveal {
                        correct: *option,
                        selected: Some(*option),
                    });
                    self.push_feedback(format!("+{points} points!"), Tone::Success);
                }
                Event::AnswerRejected {
                    selected, correct, ..
                } => {
                    self.reveal = Some(AnswerReveal {
                        correct: *correct,
                        selected: *selected,
                    });
                    let text = if selected.is_some() {
                        "Wrong answer! You lost a life."
                    } else {
                        "Time's up! You lost a life."
                    };
                    self.push_feedback(text, Tone::Error);
                }
                Event::StageAdvanced { stage } => {
                    self.push_feedback(format!("Stage {stage} reached!"), Tone::Success);
                }
                Event::LevelAdvanced { level, .. } => {
                    self.push_feedback(format!("Level {level} reached!"), Tone::Success);
                }
                Event::PowerUpActivated {
                    kind: PowerUpKind::DoublePoints,
                    ..
                } => {
                    self.push_feedback("Double Points activated for next answer!", Tone::Success);
                }
                Event::AchievementUnlocked { id } => {
                    let achievement = achievements::achievement(*id);
                    self.popups.push(AchievementPopup {
                        id: *id,
                        icon: achievement.icon,
                        title: achievement.title,
                        description: achievement.description,
                        remaining: POPUP_DURATION,
                    });
                }
                Event::GameOver {
                    score,
                    level,
                    high_score,
                } => {
                    self.reveal = None;
                    self.game_over = Some(GameOverSummary {
                        score: *score,
                        level: *level,
                        high_score: *high_score,
                    });
                }
                Event::SessionReset => {
                    self.question = None;
                    self.reveal = None;
                    self.feedback.clear();
                    self.popups.clear();
                    self.intro = None;
                    self.game_over = None;
                }
                _ => {}
            }
        }
    }

    /// Ages transient content by `dt`, dropping what expired.
    pub fn advance(&mut self, dt: Duration) {
        for message in &mut self.feedback {
            message.remaining = message.remaining.saturating_sub(dt);
        }
        self.feedback.retain(|message| !message.remaining.is_zero());

        for popup in &mut self.popups {
            popup.remaining = popup.remaining.saturating_sub(dt);
        }
        self.popups.retain(|popup| !popup.remaining.is_zero());
    }

    fn push_feedback(&mut self, text: impl Into<String>, tone: Tone) {
        self.feedback.push(FeedbackMessage::new(text, tone));
    }
}

/// Choices a player can make, as reported by a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Picks the starting difficulty.
    ChooseDifficulty(Difficulty),
    /// Picks the category filter.
    ChooseCategory(CategoryFilter),
    /// Picks the hero.
    ChooseCharacter(Character),
    /// Leaves the intro.
    BeginQuest,
    /// Answers with the option at this index.
    Answer(usize),
    /// Uses a power-up.
    UsePowerUp(PowerUpKind),
    /// Ends the running game.
    Quit,
    /// Starts over after the game ended.
    PlayAgain,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Actions taken since the previous frame, in order.
    pub actions: Vec<PlayerAction>,
    /// Whether the player asked to close the program.
    pub exit_requested: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown above the scene.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Hellas Quest scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed frame time and
    /// the input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
