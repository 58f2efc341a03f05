//! Chess Clock - two elapsed-time counters of which at most one runs
//!
//! Elapsed time is accounted as wall-clock deltas between ticks, so a late
//! scheduler never loses time. The HTTP API is a thin presentation layer over
//! [`engine::ClockController`].

pub mod api;
pub mod clock;
pub mod config;
pub mod engine;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use engine::{ClockController, ClockSnapshot, Side, TimerEngine};
pub use state::{AppState, RunState, TimerSnapshot, TimerState};
pub use utils::{format_ms, parse_ms, shutdown_signal, FormatError};
