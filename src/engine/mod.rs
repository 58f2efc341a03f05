//! Timer engines and the controller coordinating them

pub mod controller;
pub mod ticker;
pub mod timer_engine;

pub use controller::{ClockController, ClockSnapshot, Side};
pub use ticker::TickerGuard;
pub use timer_engine::{TimerEngine, DEFAULT_TICK_INTERVAL};
