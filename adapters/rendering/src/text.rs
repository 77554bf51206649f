//! Text formatting shared by every backend.

use hellas_quest_core::{Character, HudSnapshot, PowerUpButton, PowerUpKind};

/// Number of correct answers that fill the stage progress bar.
pub const STAGE_PROGRESS_SLOTS: u32 = 5;

/// Heads-up display rendered as text lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudText {
    /// Score line.
    pub score: String,
    /// Lives line, one heart per life.
    pub lives: String,
    /// Streak line.
    pub streak: String,
    /// Level and stage line.
    pub level: String,
    /// Countdown line.
    pub time: String,
    /// Stage progress as `n/5`.
    pub progress: String,
}

impl HudText {
    /// Formats `hud`.
    #[must_use]
    pub fn from_snapshot(hud: &HudSnapshot) -> Self {
        Self {
            score: format!("Score: {}", hud.score),
            lives: format!("Lives: {}", "❤️".repeat(hud.lives as usize)),
            streak: format!("Streak: {}x", hud.streak),
            level: format!("Level {} - Stage {}", hud.level, hud.stage),
            time: format!("Time: {}s", hud.time_remaining),
            progress: format!("{}/{STAGE_PROGRESS_SLOTS}", hud.stage_progress),
        }
    }
}

/// Label of a power-up button, e.g. `Hint (2) [3s]` or `Double Points (0) [ACTIVE]`.
#[must_use]
pub fn power_up_label(button: &PowerUpButton) -> String {
    let mut label = format!("{} ({})", button.kind.label(), button.uses);
    if button.kind == PowerUpKind::DoublePoints {
        if button.active {
            label.push_str(" [ACTIVE]");
        }
    } else if button.cooldown_secs > 0 {
        label.push_str(&format!(" [{}s]", button.cooldown_secs));
    }
    label
}

/// Storyline shown between hero selection and the first question.
#[must_use]
pub fn storyline(character: Character) -> String {
    format!(
        "Welcome, {}. {}. Your quest begins now!",
        character.name(),
        character.description()
    )
}

/// Ability line shown under the storyline.
#[must_use]
pub fn ability_line(character: Character) -> String {
    format!("Ability: {}", character.ability())
}
