//! Timer state structure and its transitions
//!
//! Pure state machine: every transition is handed `now` by the caller, so no
//! scheduling or clock access happens here.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::utils::format_ms;

/// Whether a timer is accumulating time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Stopped,
    Running,
}

/// Elapsed-time accounting for one timer.
///
/// `last_tick_at` is `Some` exactly when the timer is running.
#[derive(Debug, Clone)]
pub struct TimerState {
    elapsed_ms: u64,
    run_state: RunState,
    last_tick_at: Option<Instant>,
    /// Bumped on every (re)schedule; ticks from an older schedule are ignored
    epoch: u64,
}

impl TimerState {
    /// Create a stopped timer at zero
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            run_state: RunState::Stopped,
            last_tick_at: None,
            epoch: 0,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn last_tick_at(&self) -> Option<Instant> {
        self.last_tick_at
    }

    /// Schedule generation that ticks must carry
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Begin running. Returns false if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }

        self.run_state = RunState::Running;
        if self.last_tick_at.is_none() {
            self.last_tick_at = Some(now);
        }
        self.epoch += 1;
        true
    }

    /// Freeze the accumulated value. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.run_state = RunState::Stopped;
        self.last_tick_at = None;
        self.epoch += 1;
        true
    }

    /// Zero the accumulator; a running timer restarts its accounting from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.elapsed_ms = 0;
        if self.is_running() {
            self.last_tick_at = Some(now);
            self.epoch += 1;
        } else {
            self.last_tick_at = None;
        }
    }

    /// Overwrite the accumulator. Always leaves the timer stopped.
    pub fn set_value(&mut self, ms: u64) {
        if self.is_running() {
            self.epoch += 1;
        }
        self.elapsed_ms = ms;
        self.last_tick_at = None;
        self.run_state = RunState::Stopped;
    }

    /// Account the wall-clock delta since the last tick.
    ///
    /// Only whole milliseconds are credited; the tick origin advances by the
    /// credited amount so the sub-millisecond remainder carries forward.
    ///
    /// Returns the applied delta, or `None` when the tick is stale: the timer
    /// is stopped or `epoch` belongs to a schedule that has been replaced.
    pub fn tick(&mut self, now: Instant, epoch: u64) -> Option<u64> {
        if epoch != self.epoch || !self.is_running() {
            return None;
        }
        let last = self.last_tick_at?;

        let delta = now.saturating_duration_since(last).as_millis();
        let delta = u64::try_from(delta).unwrap_or(u64::MAX);
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta);
        self.last_tick_at = Some(
            last.checked_add(Duration::from_millis(delta)).unwrap_or(now),
        );
        Some(delta)
    }

    /// Display form of the accumulated value
    pub fn display(&self) -> String {
        format_ms(self.elapsed_ms)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a timer handed to the presentation side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub elapsed_ms: u64,
    pub display: String,
    pub run_state: RunState,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            elapsed_ms: state.elapsed_ms(),
            display: state.display(),
            run_state: state.run_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    fn running_at(clock: &ManualClock) -> TimerState {
        let mut state = TimerState::new();
        assert!(state.start(clock.now()));
        state
    }

    #[test]
    fn starts_stopped_at_zero() {
        let state = TimerState::new();
        assert_eq!(state.elapsed_ms(), 0);
        assert_eq!(state.run_state(), RunState::Stopped);
        assert!(state.last_tick_at().is_none());
        assert_eq!(state.display(), "00:00:00");
    }

    #[test]
    fn start_records_tick_origin() {
        let clock = ManualClock::new();
        let state = running_at(&clock);
        assert_eq!(state.run_state(), RunState::Running);
        assert_eq!(state.last_tick_at(), Some(clock.now()));
    }

    #[test]
    fn start_twice_is_noop() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let epoch = state.epoch();

        clock.advance(Duration::from_millis(700));
        assert!(!state.start(clock.now()));
        assert_eq!(state.epoch(), epoch);
        assert_eq!(state.last_tick_at(), Some(clock.now() - Duration::from_millis(700)));
    }

    #[test]
    fn tick_accumulates_wall_clock_delta() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let epoch = state.epoch();

        clock.advance(Duration::from_millis(1_000));
        assert_eq!(state.tick(clock.now(), epoch), Some(1_000));

        // A late scheduler fire still accounts the real delta
        clock.advance(Duration::from_millis(1_370));
        assert_eq!(state.tick(clock.now(), epoch), Some(1_370));
        assert_eq!(state.elapsed_ms(), 2_370);
        assert_eq!(state.last_tick_at(), Some(clock.now()));
    }

    #[test]
    fn sub_millisecond_lateness_does_not_drift() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let origin = clock.now();
        let epoch = state.epoch();

        // Every fire arrives 0.9ms late
        for _ in 0..3_600 {
            clock.advance(Duration::from_micros(1_000_900));
            state.tick(clock.now(), epoch);
        }

        let wall = (clock.now() - origin).as_millis() as u64;
        assert_eq!(wall, 3_603_240);
        assert_eq!(state.elapsed_ms(), wall);
        // Remainder carried, never more than a millisecond behind
        let pending = clock.now() - state.last_tick_at().unwrap();
        assert!(pending < Duration::from_millis(1));
    }

    #[test]
    fn fractional_remainder_is_credited_on_later_tick() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let epoch = state.epoch();

        clock.advance(Duration::from_micros(1_500));
        assert_eq!(state.tick(clock.now(), epoch), Some(1));
        clock.advance(Duration::from_micros(1_500));
        assert_eq!(state.tick(clock.now(), epoch), Some(2));
        assert_eq!(state.elapsed_ms(), 3);
    }

    #[test]
    fn restart_after_stop_does_not_recredit_remainder() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);

        clock.advance(Duration::from_micros(1_000_700));
        state.tick(clock.now(), state.epoch());
        state.stop();
        assert_eq!(state.elapsed_ms(), 1_000);

        state.start(clock.now());
        clock.advance(Duration::from_millis(1_000));
        assert_eq!(state.tick(clock.now(), state.epoch()), Some(1_000));
        assert_eq!(state.elapsed_ms(), 2_000);
    }

    #[test]
    fn stop_keeps_only_accounted_time() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let epoch = state.epoch();

        clock.advance(Duration::from_millis(1_000));
        state.tick(clock.now(), epoch);
        clock.advance(Duration::from_millis(500));

        assert!(state.stop());
        assert_eq!(state.elapsed_ms(), 1_000);
        assert_eq!(state.run_state(), RunState::Stopped);
        assert!(state.last_tick_at().is_none());
    }

    #[test]
    fn stop_twice_equals_stop_once() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        assert!(state.stop());
        let after_first = (state.elapsed_ms(), state.run_state(), state.epoch());

        assert!(!state.stop());
        assert_eq!((state.elapsed_ms(), state.run_state(), state.epoch()), after_first);
    }

    #[test]
    fn tick_after_stop_is_ignored() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let epoch = state.epoch();
        state.stop();

        clock.advance(Duration::from_millis(1_000));
        assert_eq!(state.tick(clock.now(), epoch), None);
        assert_eq!(state.elapsed_ms(), 0);
    }

    #[test]
    fn reset_while_running_restarts_from_now() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let old_epoch = state.epoch();

        clock.advance(Duration::from_millis(1_000));
        state.tick(clock.now(), old_epoch);
        clock.advance(Duration::from_millis(400));
        state.reset(clock.now());

        assert_eq!(state.elapsed_ms(), 0);
        assert!(state.is_running());
        assert_eq!(state.last_tick_at(), Some(clock.now()));

        // The replaced schedule can no longer tick
        clock.advance(Duration::from_millis(600));
        assert_eq!(state.tick(clock.now(), old_epoch), None);

        clock.advance(Duration::from_millis(400));
        assert_eq!(state.tick(clock.now(), state.epoch()), Some(1_000));
    }

    #[test]
    fn reset_while_stopped_only_zeroes() {
        let clock = ManualClock::new();
        let mut state = TimerState::new();
        state.set_value(42_000);
        let epoch = state.epoch();

        state.reset(clock.now());
        assert_eq!(state.elapsed_ms(), 0);
        assert!(!state.is_running());
        assert!(state.last_tick_at().is_none());
        assert_eq!(state.epoch(), epoch);
    }

    #[test]
    fn set_value_stops_running_timer() {
        let clock = ManualClock::new();
        let mut state = running_at(&clock);
        let epoch = state.epoch();

        state.set_value(5_000);
        assert_eq!(state.elapsed_ms(), 5_000);
        assert_eq!(state.run_state(), RunState::Stopped);
        assert!(state.last_tick_at().is_none());

        clock.advance(Duration::from_millis(1_000));
        assert_eq!(state.tick(clock.now(), epoch), None);
        assert_eq!(state.elapsed_ms(), 5_000);
    }

    #[test]
    fn restart_after_edit_counts_from_edited_value() {
        let clock = ManualClock::new();
        let mut state = TimerState::new();
        state.set_value(60_000);

        state.start(clock.now());
        clock.advance(Duration::from_millis(1_000));
        state.tick(clock.now(), state.epoch());
        assert_eq!(state.display(), "00:01:01");
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut state = TimerState::new();
        state.set_value(3_723_400);
        let snapshot = TimerSnapshot::from(&state);
        assert_eq!(snapshot.elapsed_ms, 3_723_400);
        assert_eq!(snapshot.display, "01:02:03");
        assert_eq!(snapshot.run_state, RunState::Stopped);
    }

    #[test]
    fn run_state_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RunState::Running).unwrap(), "\"RUNNING\"");
        assert_eq!(serde_json::to_string(&RunState::Stopped).unwrap(), "\"STOPPED\"");
    }
}
