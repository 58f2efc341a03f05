//! State management module
//!
//! Timer accounting state and the shared application state served over HTTP.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{RunState, TimerSnapshot, TimerState};
