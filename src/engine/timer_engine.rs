//! Timer engine: one timer's state plus its periodic ticker

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, info};

use super::ticker::TickerGuard;
use crate::{
    clock::Clock,
    state::{RunState, TimerSnapshot, TimerState},
};

/// Default scheduler period
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1_000);

/// State shared between the engine and its ticker task
#[derive(Debug)]
struct Shared {
    name: &'static str,
    state: Mutex<TimerState>,
    updates: watch::Sender<TimerSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TimerState> {
        // TimerState transitions never panic halfway, so a poisoned value is still consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &TimerState) {
        self.updates.send_replace(TimerSnapshot::from(state));
    }

    fn on_tick(&self, clock: &dyn Clock, epoch: u64) -> ControlFlow<()> {
        let mut state = self.lock();
        match state.tick(clock.now(), epoch) {
            Some(delta) => {
                debug!(
                    "{} timer tick: +{}ms, elapsed={}",
                    self.name,
                    delta,
                    state.display()
                );
                self.publish(&state);
                ControlFlow::Continue(())
            }
            None => {
                debug!("{} timer discarded stale tick", self.name);
                ControlFlow::Break(())
            }
        }
    }
}

/// A single elapsed-time counter.
///
/// Operations are synchronous and must run inside a tokio runtime, since
/// starting spawns the ticker. The ticker is cancelled on stop, on reset
/// while running, on edit, and when the engine is dropped.
#[derive(Debug)]
pub struct TimerEngine {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    ticker: Option<TickerGuard>,
}

impl TimerEngine {
    pub fn new(name: &'static str, clock: Arc<dyn Clock>, tick_interval: Duration) -> Self {
        let state = TimerState::new();
        let (updates, _) = watch::channel(TimerSnapshot::from(&state));

        Self {
            shared: Arc::new(Shared {
                name,
                state: Mutex::new(state),
                updates,
            }),
            clock,
            // tokio intervals reject a zero period
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            ticker: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.shared.name
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.shared.lock().elapsed_ms()
    }

    pub fn run_state(&self) -> RunState {
        self.shared.lock().run_state()
    }

    pub fn is_running(&self) -> bool {
        self.run_state() == RunState::Running
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&*self.shared.lock())
    }

    /// Follow snapshots published after every change and tick
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Start running. Returns false if the timer was already running.
    pub fn start(&mut self) -> bool {
        let mut state = self.shared.lock();
        if !state.start(self.clock.now()) {
            return false;
        }
        let epoch = state.epoch();
        self.shared.publish(&state);
        drop(state);

        self.schedule(epoch);
        info!("{} timer started", self.name());
        true
    }

    /// Stop running. Returns false if the timer was already stopped.
    pub fn stop(&mut self) -> bool {
        let mut state = self.shared.lock();
        if !state.stop() {
            return false;
        }
        self.ticker = None;
        self.shared.publish(&state);
        info!("{} timer stopped at {}", self.name(), state.display());
        true
    }

    /// Zero the timer. A running timer keeps running with a fresh schedule.
    pub fn reset(&mut self) {
        let mut state = self.shared.lock();
        state.reset(self.clock.now());
        let restart = state.is_running().then(|| state.epoch());
        self.shared.publish(&state);
        drop(state);

        if let Some(epoch) = restart {
            self.schedule(epoch);
        }
        info!("{} timer reset", self.name());
    }

    /// Overwrite the elapsed value. Also stops the timer if it was running.
    pub fn set_value(&mut self, ms: u64) {
        let mut state = self.shared.lock();
        let was_running = state.is_running();
        state.set_value(ms);
        self.ticker = None;
        self.shared.publish(&state);

        if was_running {
            info!("{} timer set to {} (stopped by edit)", self.name(), state.display());
        } else {
            info!("{} timer set to {}", self.name(), state.display());
        }
    }

    fn schedule(&mut self, epoch: u64) {
        let shared = Arc::clone(&self.shared);
        let clock = Arc::clone(&self.clock);
        // Replacing the guard aborts any previous ticker
        self.ticker = Some(TickerGuard::spawn(self.tick_interval, move || {
            shared.on_tick(clock.as_ref(), epoch)
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use tokio::time::sleep;

    fn engine() -> TimerEngine {
        TimerEngine::new("test", Arc::new(SystemClock::new()), DEFAULT_TICK_INTERVAL)
    }

    #[tokio::test(start_paused = true)]
    async fn only_completed_ticks_are_accounted() {
        let mut engine = engine();
        assert!(engine.start());

        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(engine.elapsed_ms(), 2_000);

        assert!(engine.stop());
        assert_eq!(engine.elapsed_ms(), 2_000);
        assert_eq!(engine.run_state(), RunState::Stopped);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.elapsed_ms(), 2_000);
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_keeps_schedule() {
        let mut engine = engine();
        engine.start();
        sleep(Duration::from_millis(600)).await;

        assert!(!engine.start());
        sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.elapsed_ms(), 1_000);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let mut engine = engine();
        engine.start();
        sleep(Duration::from_millis(1_200)).await;

        assert!(engine.stop());
        let first = engine.snapshot();
        assert!(!engine.stop());
        assert_eq!(engine.snapshot(), first);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_running_has_no_phantom_tick() {
        let mut engine = engine();
        engine.start();
        sleep(Duration::from_millis(1_500)).await;
        assert_eq!(engine.elapsed_ms(), 1_000);

        engine.reset();
        assert_eq!(engine.elapsed_ms(), 0);
        assert!(engine.is_running());

        // The old schedule would have fired at +2000
        sleep(Duration::from_millis(900)).await;
        assert_eq!(engine.elapsed_ms(), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(engine.elapsed_ms(), 1_000);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_stopped_stays_stopped() {
        let mut engine = engine();
        engine.set_value(9_000);
        engine.reset();

        sleep(Duration::from_secs(3)).await;
        assert_eq!(engine.elapsed_ms(), 0);
        assert_eq!(engine.run_state(), RunState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn set_value_stops_running_engine() {
        let mut engine = engine();
        engine.start();
        sleep(Duration::from_millis(1_500)).await;

        engine.set_value(5_000);
        assert_eq!(engine.run_state(), RunState::Stopped);
        assert_eq!(engine.elapsed_ms(), 5_000);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(engine.elapsed_ms(), 5_000);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_engine_cancels_ticker() {
        let mut engine = engine();
        let mut updates = engine.subscribe();
        engine.start();
        drop(engine);

        sleep(Duration::from_secs(3)).await;
        // Sender side is gone with the engine; no tick ever published
        assert_eq!(updates.borrow_and_update().elapsed_ms, 0);
        assert!(updates.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_snapshots() {
        let mut engine = engine();
        let mut updates = engine.subscribe();

        engine.start();
        assert_eq!(updates.borrow_and_update().run_state, RunState::Running);

        sleep(Duration::from_millis(1_100)).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().display, "00:00:01");
    }

    #[tokio::test(start_paused = true)]
    async fn custom_interval_is_honoured() {
        let mut engine = TimerEngine::new(
            "fast",
            Arc::new(SystemClock::new()),
            Duration::from_millis(250),
        );
        engine.start();
        sleep(Duration::from_millis(900)).await;
        assert_eq!(engine.elapsed_ms(), 750);
    }
}
