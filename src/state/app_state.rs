//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    clock::Clock,
    engine::{ClockController, ClockSnapshot, Side},
    utils::{parse_ms, FormatError},
};

/// Why a presentation gesture was refused
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("The {0} timer is already running")]
    AlreadyRunning(Side),

    #[error("The {0} timer cannot be edited while running")]
    EditWhileRunning(Side),

    #[error("Invalid time value: {0}")]
    InvalidValue(#[from] FormatError),

    #[error("{0}")]
    Internal(String),
}

/// Main application state shared by the HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// Both timers; every gesture is serialized through this lock
    pub clock: Arc<Mutex<ClockController>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState with both timers stopped at zero
    pub fn new(
        port: u16,
        host: String,
        time_source: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            clock: Arc::new(Mutex::new(ClockController::new(time_source, tick_interval))),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run an operation on the controller and record it as the last action
    pub fn update_clock<T, F>(&self, action: &str, updater: F) -> Result<T, ActionError>
    where
        F: FnOnce(&mut ClockController) -> Result<T, ActionError>,
    {
        let mut clock = self.clock.lock()
            .map_err(|e| ActionError::Internal(format!("Failed to lock clock: {}", e)))?;

        let result = updater(&mut clock)?;
        drop(clock); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    /// Start one side, stopping the other. Refused if that side already runs.
    pub fn start(&self, side: Side) -> Result<ClockSnapshot, ActionError> {
        info!("Starting {} timer", side);
        self.update_clock(&format!("{}-start", side), |clock| {
            if clock.engine(side).is_running() {
                return Err(ActionError::AlreadyRunning(side));
            }
            clock.start(side);
            Ok(clock.snapshot())
        })
    }

    pub fn stop(&self, side: Side) -> Result<ClockSnapshot, ActionError> {
        info!("Stopping {} timer", side);
        self.update_clock(&format!("{}-stop", side), |clock| {
            clock.stop(side);
            Ok(clock.snapshot())
        })
    }

    pub fn reset(&self, side: Side) -> Result<ClockSnapshot, ActionError> {
        info!("Resetting {} timer", side);
        self.update_clock(&format!("{}-reset", side), |clock| {
            clock.reset(side);
            Ok(clock.snapshot())
        })
    }

    /// Apply an edited `HH:MM:SS` value. Refused while that side runs.
    pub fn edit(&self, side: Side, value: &str) -> Result<ClockSnapshot, ActionError> {
        let ms = parse_ms(value).map_err(|e| {
            warn!("Rejected {} timer value '{}': {}", side, value, e);
            ActionError::from(e)
        })?;

        info!("Editing {} timer to {}ms", side, ms);
        self.update_clock(&format!("{}-edit", side), |clock| {
            if clock.engine(side).is_running() {
                return Err(ActionError::EditWhileRunning(side));
            }
            clock.set_value(side, ms);
            Ok(clock.snapshot())
        })
    }

    pub fn stop_all(&self) -> Result<ClockSnapshot, ActionError> {
        self.update_clock("stop-all", |clock| {
            clock.stop_all();
            Ok(clock.snapshot())
        })
    }

    pub fn reset_all(&self) -> Result<ClockSnapshot, ActionError> {
        self.update_clock("reset-all", |clock| {
            clock.reset_all();
            Ok(clock.snapshot())
        })
    }

    /// Get current state of both timers
    pub fn get_snapshot(&self) -> Result<ClockSnapshot, String> {
        self.clock.lock()
            .map(|clock| clock.snapshot())
            .map_err(|e| format!("Failed to lock clock: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
