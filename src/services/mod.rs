//! Alarm sound services
//!
//! Platform players and the supervisor that keeps at most one of their
//! sounds alive.

pub mod players;
pub mod sound;

// Re-export main types
pub use players::{
    default_player, log_available_players, ExternalProcessPlayer, PlaybackHandle, PlayerCommand,
    SilentPlayer, SoundError, SoundPlayer,
};
#[cfg(windows)]
pub use players::NativeAsyncSound;
pub use sound::{AttemptId, SoundSupervisor};
