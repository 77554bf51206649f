#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Power-up allowances, cooldowns and answer elimination.
//!
//! Every power-up is independent: its own use counter, and either a cooldown
//! slot (hint, strike, time freeze) or an armed flag (double points). A
//! rejected activation leaves all state untouched.

use std::time::Duration;

use hellas_quest_core::{Event, PowerUpButton, PowerUpKind, SlotTimers};
use serde::Deserialize;

/// Uses and cooldown granted to a single power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Allowance {
    /// Activations available per game.
    pub uses: u32,
    /// Seconds the power-up stays disabled after an activation.
    #[serde(default)]
    pub cooldown_secs: u32,
}

impl Allowance {
    /// Creates a new allowance.
    #[must_use]
    pub const fn new(uses: u32, cooldown_secs: u32) -> Self {
        Self {
            uses,
            cooldown_secs,
        }
    }
}

/// Allowances for every power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Hint allowance.
    pub hint: Allowance,
    /// Strike allowance.
    pub strike: Allowance,
    /// Time freeze allowance.
    pub time_freeze: Allowance,
    /// Double points allowance; its cooldown is ignored.
    pub double_points: Allowance,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            hint: Allowance::new(3, 3),
            strike: Allowance::new(2, 5),
            time_freeze: Allowance::new(2, 4),
            double_points: Allowance::new(1, 0),
        }
    }
}

impl PowerUpConfig {
    /// Allowance configured for `kind`.
    #[must_use]
    pub const fn allowance(&self, kind: PowerUpKind) -> Allowance {
        match kind {
            PowerUpKind::Hint => self.hint,
            PowerUpKind::Strike => self.strike,
            PowerUpKind::TimeFreeze => self.time_freeze,
            PowerUpKind::DoublePoints => self.double_points,
        }
    }
}

/// Mutable power-up state for one game.
#[derive(Clone, Debug)]
pub struct PowerUps {
    config: PowerUpConfig,
    uses: [u32; 4],
    double_points_armed: bool,
    cooldowns: SlotTimers<PowerUpKind>,
}

impl PowerUps {
    /// Creates fresh power-ups with the configured allowances.
    #[must_use]
    pub fn new(config: PowerUpConfig) -> Self {
        Self {
            config,
            uses: PowerUpKind::ALL.map(|kind| config.allowance(kind).uses),
            double_points_armed: false,
            cooldowns: SlotTimers::new(),
        }
    }

    /// Adds extra uses to `kind`.
    pub fn grant(&mut self, kind: PowerUpKind, extra: u32) {
        let uses = &mut self.uses[slot(kind)];
        *uses = uses.saturating_add(extra);
    }

    /// Uses left for `kind`.
    #[must_use]
    pub const fn uses(&self, kind: PowerUpKind) -> u32 {
        self.uses[slot(kind)]
    }

    /// Whole seconds of cooldown left for `kind`.
    #[must_use]
    pub fn cooldown_secs(&self, kind: PowerUpKind) -> u32 {
        self.cooldowns.whole_seconds(kind)
    }

    /// Reports whether double points is armed for the next correct answer.
    #[must_use]
    pub const fn double_points_armed(&self) -> bool {
        self.double_points_armed
    }

    /// Reports whether activating `kind` would succeed.
    #[must_use]
    pub fn is_available(&self, kind: PowerUpKind) -> bool {
        if self.uses(kind) == 0 {
            return false;
        }
        match kind {
            PowerUpKind::DoublePoints => !self.double_points_armed,
            _ => !self.cooldowns.is_running(kind),
        }
    }

    /// Spends a use of `kind` and starts its cooldown or arms it.
    ///
    /// Returns `false`, leaving every counter untouched, when the power-up is
    /// out of uses, cooling down, or already armed.
    pub fn try_activate(&mut self, kind: PowerUpKind) -> bool {
        if !self.is_available(kind) {
            return false;
        }

        self.uses[slot(kind)] -= 1;
        match kind {
            PowerUpKind::DoublePoints => self.double_points_armed = true,
            _ => {
                let cooldown = self.config.allowance(kind).cooldown_secs;
                self.cooldowns
                    .start(kind, Duration::from_secs(u64::from(cooldown)));
            }
        }
        true
    }

    /// Disarms double points, reporting whether it was armed.
    pub fn consume_double_points(&mut self) -> bool {
        std::mem::replace(&mut self.double_points_armed, false)
    }

    /// Advances every running cooldown by `dt`.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) {
        self.cooldowns.advance(dt, |kind, step| {
            if step.expired {
                out.push(Event::PowerUpReady { kind });
            } else {
                out.push(Event::CooldownChanged {
                    kind,
                    remaining: step.remaining_secs,
                });
            }
        });
    }

    /// Cancels every running cooldown.
    pub fn stop_cooldowns(&mut self) {
        self.cooldowns.clear();
    }

    /// Button state of every power-up in display order.
    #[must_use]
    pub fn buttons(&self) -> Vec<PowerUpButton> {
        PowerUpKind::ALL
            .iter()
            .map(|kind| PowerUpButton {
                kind: *kind,
                uses: self.uses(*kind),
                cooldown_secs: self.cooldown_secs(*kind),
                active: *kind == PowerUpKind::DoublePoints && self.double_points_armed,
                enabled: self.is_available(*kind),
            })
            .collect()
    }
}

const fn slot(kind: PowerUpKind) -> usize {
    match kind {
        PowerUpKind::Hint => 0,
        PowerUpKind::Strike => 1,
        PowerUpKind::TimeFreeze => 2,
        PowerUpKind::DoublePoints => 3,
    }
}

/// Elimination-relevant state of one presented answer option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionState {
    /// Whether the option is the correct answer.
    pub correct: bool,
    /// Whether the option was already disabled.
    pub disabled: bool,
}

/// Options a hint disables: the first half, rounded down, of the enabled wrong options.
#[must_use]
pub fn hint_targets(options: &[OptionState]) -> Vec<usize> {
    let wrong = enabled_wrong_options(options);
    let count = wrong.len() / 2;
    wrong.into_iter().take(count).collect()
}

/// Options a strike disables: every enabled wrong option.
#[must_use]
pub fn strike_targets(options: &[OptionState]) -> Vec<usize> {
    enabled_wrong_options(options)
}

fn enabled_wrong_options(options: &[OptionState]) -> Vec<usize> {
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| !option.correct && !option.disabled)
        .map(|(index, _)| index)
        .collect()
}
