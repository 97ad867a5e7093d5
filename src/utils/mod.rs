//! Utility functions module
//!
//! Duration string conversion and shutdown signal handling.

pub mod duration;
pub mod signals;

// Re-export main functions
pub use duration::{format_hms, label, parse_hms};
pub use signals::shutdown_signal;
