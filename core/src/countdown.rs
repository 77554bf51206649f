//! Cancelable countdown timers driven by explicit simulated time.

use std::time::Duration;

/// Single countdown that fires its expiry exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    /// Creates a countdown that expires after the provided duration.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    /// Creates a countdown measured in whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u32) -> Self {
        Self::new(Duration::from_secs(secs as u64))
    }

    /// Time left before the countdown expires.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Remaining time rounded up to whole seconds, as shown to the player.
    #[must_use]
    pub fn whole_seconds(&self) -> u32 {
        let secs = self.remaining.as_secs();
        let rounded = if self.remaining.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        u32::try_from(rounded).unwrap_or(u32::MAX)
    }

    /// Reports whether the countdown already reached zero.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Adds time to a running countdown without restarting it.
    pub fn extend(&mut self, by: Duration) {
        self.remaining = self.remaining.saturating_add(by);
    }

    /// Consumes `dt` of simulated time.
    ///
    /// An expired countdown no longer reports anything, so the expiry is
    /// observed by exactly one call.
    pub fn advance(&mut self, dt: Duration) -> CountdownStep {
        if self.is_expired() {
            return CountdownStep {
                remaining_secs: 0,
                seconds_changed: false,
                expired: false,
            };
        }

        let before = self.whole_seconds();
        self.remaining = self.remaining.saturating_sub(dt);
        let after = self.whole_seconds();
        CountdownStep {
            remaining_secs: after,
            seconds_changed: after != before,
            expired: self.is_expired(),
        }
    }
}

/// Outcome of advancing a [`Countdown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownStep {
    /// Whole seconds left after the advance.
    pub remaining_secs: u32,
    /// Whether the displayed whole-second value changed.
    pub seconds_changed: bool,
    /// Whether this advance made the countdown expire.
    pub expired: bool,
}

/// Keyed collection holding at most one countdown per slot.
#[derive(Clone, Debug)]
pub struct SlotTimers<K> {
    slots: Vec<(K, Countdown)>,
}

impl<K> Default for SlotTimers<K> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<K: Copy + Eq> SlotTimers<K> {
    /// Creates an empty timer collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Starts a countdown in `slot`, replacing any countdown already running there.
    ///
    /// Zero-length countdowns are never started.
    pub fn start(&mut self, slot: K, duration: Duration) {
        self.cancel(slot);
        if !duration.is_zero() {
            self.slots.push((slot, Countdown::new(duration)));
        }
    }

    /// Stops the countdown running in `slot`, if any.
    pub fn cancel(&mut self, slot: K) {
        self.slots.retain(|(key, _)| *key != slot);
    }

    /// Stops every countdown.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Reports whether a countdown is running in `slot`.
    #[must_use]
    pub fn is_running(&self, slot: K) -> bool {
        self.get(slot).is_some()
    }

    /// Returns the countdown running in `slot`.
    #[must_use]
    pub fn get(&self, slot: K) -> Option<&Countdown> {
        self.slots
            .iter()
            .find(|(key, _)| *key == slot)
            .map(|(_, countdown)| countdown)
    }

    /// Whole seconds left in `slot`, or zero when nothing is running.
    #[must_use]
    pub fn whole_seconds(&self, slot: K) -> u32 {
        self.get(slot).map_or(0, Countdown::whole_seconds)
    }

    /// Adds time to the countdown running in `slot`.
    ///
    /// Returns the new whole-second value, or `None` when the slot is idle.
    pub fn extend(&mut self, slot: K, by: Duration) -> Option<u32> {
        let (_, countdown) = self.slots.iter_mut().find(|(key, _)| *key == slot)?;
        countdown.extend(by);
        Some(countdown.whole_seconds())
    }

    /// Advances every countdown by `dt`.
    ///
    /// `on_step` is invoked for each slot whose displayed seconds changed or
    /// which expired during this advance. Expired slots are removed afterwards.
    pub fn advance<F>(&mut self, dt: Duration, mut on_step: F)
    where
        F: FnMut(K, CountdownStep),
    {
        for (slot, countdown) in &mut self.slots {
            let step = countdown.advance(dt);
            if step.seconds_changed || step.expired {
                on_step(*slot, step);
            }
        }
        self.slots.retain(|(_, countdown)| !countdown.is_expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_seconds_round_up_partial_seconds() {
        let mut countdown = Countdown::from_secs(30);
        let step = countdown.advance(Duration::from_millis(400));
        assert_eq!(countdown.whole_seconds(), 30);
        assert!(!step.seconds_changed);

        let step = countdown.advance(Duration::from_millis(600));
        assert_eq!(step.remaining_secs, 29);
        assert!(step.seconds_changed);
    }

    #[test]
    fn expiry_is_reported_once() {
        let mut countdown = Countdown::from_secs(1);
        let first = countdown.advance(Duration::from_secs(5));
        let second = countdown.advance(Duration::from_secs(1));
        assert!(first.expired);
        assert!(!second.expired);
        assert!(!second.seconds_changed);
    }

    #[test]
    fn starting_a_slot_replaces_previous_countdown() {
        let mut timers = SlotTimers::new();
        timers.start('q', Duration::from_secs(10));
        timers.start('q', Duration::from_secs(3));
        assert_eq!(timers.whole_seconds('q'), 3);

        let mut expired = Vec::new();
        timers.advance(Duration::from_secs(3), |slot, step| {
            if step.expired {
                expired.push(slot);
            }
        });
        assert_eq!(expired, vec!['q']);
        assert!(!timers.is_running('q'));
    }

    #[test]
    fn slots_tick_independently() {
        let mut timers = SlotTimers::new();
        timers.start(1_u8, Duration::from_secs(2));
        timers.start(2_u8, Duration::from_secs(5));

        let mut expired = Vec::new();
        timers.advance(Duration::from_secs(2), |slot, step| {
            if step.expired {
                expired.push(slot);
            }
        });

        assert_eq!(expired, vec![1]);
        assert_eq!(timers.whole_seconds(2), 3);
    }

    #[test]
    fn extend_keeps_running_countdown() {
        let mut timers = SlotTimers::new();
        timers.start((), Duration::from_secs(10));
        timers.advance(Duration::from_secs(4), |_, _| {});
        assert_eq!(timers.extend((), Duration::from_secs(15)), Some(21));
    }

    #[test]
    fn zero_length_countdowns_are_not_started() {
        let mut timers = SlotTimers::new();
        timers.start(0_u8, Duration::ZERO);
        assert!(!timers.is_running(0));
        assert_eq!(timers.extend(0, Duration::from_secs(1)), None);
    }
}
