//! State management module
//!
//! The countdown state machine and the application state that drives it.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TICK_PERIOD};
pub use timer_state::{IntervalTimer, TickOutcome, TimerConfig, TimerSnapshot, TimerState};
