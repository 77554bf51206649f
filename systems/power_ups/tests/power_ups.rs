use std::time::Duration;

use hellas_quest_core::{Event, PowerUpKind};
use hellas_quest_system_power_ups::{
    hint_targets, strike_targets, Allowance, OptionState, PowerUpConfig, PowerUps,
};

fn wrong(disabled: bool) -> OptionState {
    OptionState {
        correct: false,
        disabled,
    }
}

fn right() -> OptionState {
    OptionState {
        correct: true,
        disabled: false,
    }
}

#[test]
fn activation_spends_use_and_starts_cooldown() {
    let mut power_ups = PowerUps::new(PowerUpConfig::default());

    assert!(power_ups.try_activate(PowerUpKind::Strike));
    assert_eq!(power_ups.uses(PowerUpKind::Strike), 1);
    assert_eq!(power_ups.cooldown_secs(PowerUpKind::Strike), 5);
    assert!(!power_ups.is_available(PowerUpKind::Strike));
}

#[test]
fn cooling_down_power_up_rejects_without_spending() {
    let mut power_ups = PowerUps::new(PowerUpConfig::default());
    assert!(power_ups.try_activate(PowerUpKind::Hint));

    assert!(!power_ups.try_activate(PowerUpKind::Hint));
    assert_eq!(power_ups.uses(PowerUpKind::Hint), 2);
}

#[test]
fn cooldown_counts_down_then_reports_ready() {
    let mut power_ups = PowerUps::new(PowerUpConfig::default());
    assert!(power_ups.try_activate(PowerUpKind::Hint));

    let mut events = Vec::new();
    for _ in 0..3 {
        power_ups.advance(Duration::from_secs(1), &mut events);
    }

    assert_eq!(
        events,
        vec![
            Event::CooldownChanged {
                kind: PowerUpKind::Hint,
                remaining: 2,
            },
            Event::CooldownChanged {
                kind: PowerUpKind::Hint,
                remaining: 1,
            },
            Event::PowerUpReady {
                kind: PowerUpKind::Hint,
            },
        ]
    );
    assert!(power_ups.is_available(PowerUpKind::Hint));
}

#[test]
fn exhausted_power_up_stays_unavailable_after_cooldown() {
    let config = PowerUpConfig {
        time_freeze: Allowance::new(1, 4),
        ..PowerUpConfig::default()
    };
    let mut power_ups = PowerUps::new(config);
    assert!(power_ups.try_activate(PowerUpKind::TimeFreeze));

    let mut events = Vec::new();
    power_ups.advance(Duration::from_secs(10), &mut events);

    assert_eq!(
        events,
        vec![Event::PowerUpReady {
            kind: PowerUpKind::TimeFreeze,
        }]
    );
    assert!(!power_ups.is_available(PowerUpKind::TimeFreeze));
    assert!(!power_ups.try_activate(PowerUpKind::TimeFreeze));
}

#[test]
fn double_points_arms_once_until_consumed() {
    let mut power_ups = PowerUps::new(PowerUpConfig::default());
    power_ups.grant(PowerUpKind::DoublePoints, 1);

    assert!(power_ups.try_activate(PowerUpKind::DoublePoints));
    assert!(power_ups.double_points_armed());
    assert!(!power_ups.try_activate(PowerUpKind::DoublePoints));
    assert_eq!(power_ups.uses(PowerUpKind::DoublePoints), 1);

    assert!(power_ups.consume_double_points());
    assert!(!power_ups.consume_double_points());
    assert!(power_ups.try_activate(PowerUpKind::DoublePoints));
}

#[test]
fn grant_adds_extra_hint() {
    let mut power_ups = PowerUps::new(PowerUpConfig::default());
    power_ups.grant(PowerUpKind::Hint, 1);
    assert_eq!(power_ups.uses(PowerUpKind::Hint), 4);
}

#[test]
fn stopping_cooldowns_silences_them() {
    let mut power_ups = PowerUps::new(PowerUpConfig::default());
    assert!(power_ups.try_activate(PowerUpKind::Strike));
    power_ups.stop_cooldowns();

    let mut events = Vec::new();
    power_ups.advance(Duration::from_secs(10), &mut events);
    assert!(events.is_empty());
    assert_eq!(power_ups.cooldown_secs(PowerUpKind::Strike), 0);
}

#[test]
fn buttons_mirror_state() {
    let mut power_ups = PowerUps::new(PowerUpConfig::default());
    assert!(power_ups.try_activate(PowerUpKind::TimeFreeze));
    assert!(power_ups.try_activate(PowerUpKind::DoublePoints));

    let buttons = power_ups.buttons();
    assert_eq!(buttons.len(), 4);

    let time_freeze = buttons[2];
    assert_eq!(time_freeze.kind, PowerUpKind::TimeFreeze);
    assert_eq!(time_freeze.uses, 1);
    assert_eq!(time_freeze.cooldown_secs, 4);
    assert!(!time_freeze.enabled);

    let double_points = buttons[3];
    assert!(double_points.active);
    assert!(!double_points.enabled);
    assert_eq!(double_points.uses, 0);
}

#[test]
fn hint_rounds_down_over_enabled_wrong_options() {
    assert_eq!(hint_targets(&[wrong(false), right(), wrong(true), wrong(false)]), vec![0]);
    assert!(hint_targets(&[wrong(true), right(), wrong(true), wrong(false)]).is_empty());
}

#[test]
fn strike_skips_disabled_and_correct_options() {
    assert_eq!(
        strike_targets(&[wrong(true), wrong(false), right(), wrong(false)]),
        vec![1, 3]
    );
    assert!(strike_targets(&[wrong(true), right(), wrong(true), wrong(true)]).is_empty());
}
