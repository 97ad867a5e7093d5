//! API response structures

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerSnapshot;

/// API response structure for timer change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response after a change was applied
    pub fn updated(message: String, timer: TimerSnapshot) -> Self {
        Self::new("updated", message, timer)
    }

    /// Response after an edit that had no effect
    pub fn unchanged(message: String, timer: TimerSnapshot) -> Self {
        Self::new("unchanged", message, timer)
    }

    /// Response reflecting the running flag of the timer
    pub fn for_timer(message: String, timer: TimerSnapshot) -> Self {
        let status = if timer.running { "running" } else { "idle" };
        Self::new(status, message, timer)
    }
}

/// Body of PUT /duration; `duration` wins if both are given
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DurationRequest {
    /// `S`, `M:S` or `H:M:S`
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub seconds: Option<i64>,
}

/// Body of PUT /sound; a missing, null or empty path clears the sound
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundRequest {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Full status of the timer and its alarm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    /// e.g. `Next: 00:01:00`
    pub label: String,
    /// Configured duration as `HH:MM:SS`
    pub duration: String,
    pub sound_path: Option<PathBuf>,
    pub sound_player: String,
    pub playback_active: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
