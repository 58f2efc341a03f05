//! Utility functions module
//!
//! Time display conversion and signal handling.

pub mod signals;
pub mod time_format;

// Re-export main functions
pub use signals::shutdown_signal;
pub use time_format::{format_ms, parse_ms, FormatError};
