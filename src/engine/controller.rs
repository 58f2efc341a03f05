//! Clock controller owning the two timers

use std::{fmt, sync::Arc, time::Duration};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use super::timer_engine::TimerEngine;
use crate::{clock::Clock, state::TimerSnapshot};

/// Which of the two timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both timers as seen by the presentation side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub left: TimerSnapshot,
    pub right: TimerSnapshot,
    pub running: Option<Side>,
}

/// Two timers of which at most one runs.
///
/// The controller holds the running token: starting one side stops the other
/// first, then hands the token over. Engines never look at each other.
#[derive(Debug)]
pub struct ClockController {
    left: TimerEngine,
    right: TimerEngine,
    running: Option<Side>,
}

impl ClockController {
    pub fn new(clock: Arc<dyn Clock>, tick_interval: Duration) -> Self {
        Self {
            left: TimerEngine::new("left", Arc::clone(&clock), tick_interval),
            right: TimerEngine::new("right", clock, tick_interval),
            running: None,
        }
    }

    pub fn engine(&self, side: Side) -> &TimerEngine {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn engine_mut(&mut self, side: Side) -> &mut TimerEngine {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Side currently holding the running token
    pub fn running(&self) -> Option<Side> {
        self.running
    }

    /// Stop the other side, then start `side`.
    /// Returns false if `side` was already running.
    pub fn start(&mut self, side: Side) -> bool {
        self.stop(side.other());
        let started = self.engine_mut(side).start();
        self.running = Some(side);
        self.check_exclusive();
        started
    }

    pub fn start_left(&mut self) -> bool {
        self.start(Side::Left)
    }

    pub fn start_right(&mut self) -> bool {
        self.start(Side::Right)
    }

    /// Returns false if `side` was already stopped
    pub fn stop(&mut self, side: Side) -> bool {
        let stopped = self.engine_mut(side).stop();
        if self.running == Some(side) {
            self.running = None;
        }
        stopped
    }

    pub fn reset(&mut self, side: Side) {
        self.engine_mut(side).reset();
    }

    /// Edit a timer's value; a running timer is stopped by the edit.
    pub fn set_value(&mut self, side: Side, ms: u64) {
        self.engine_mut(side).set_value(ms);
        if self.running == Some(side) {
            self.running = None;
        }
    }

    pub fn stop_all(&mut self) {
        self.stop(Side::Left);
        self.stop(Side::Right);
        info!("All timers stopped");
    }

    /// Each engine decides on its own whether to reschedule
    pub fn reset_all(&mut self) {
        self.left.reset();
        self.right.reset();
        info!("All timers reset");
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            left: self.left.snapshot(),
            right: self.right.snapshot(),
            running: self.running,
        }
    }

    pub fn subscribe(&self, side: Side) -> watch::Receiver<TimerSnapshot> {
        self.engine(side).subscribe()
    }

    fn check_exclusive(&self) {
        debug_assert!(
            !(self.left.is_running() && self.right.is_running()),
            "both timers running"
        );
        debug_assert_eq!(
            self.running.map(|side| self.engine(side).is_running()),
            self.running.map(|_| true)
        );
    }
}
