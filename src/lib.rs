//! Interval Chime - a repeating countdown timer with an audible alarm
//!
//! The countdown restarts as soon as it reaches zero, ringing an alarm
//! sound each time. Playback is supervised so that only one alarm sound is
//! ever alive, and it is always silenced on stop and shutdown.

pub mod api;
pub mod config;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use settings::{JsonFileStore, Settings, SettingsStore};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
