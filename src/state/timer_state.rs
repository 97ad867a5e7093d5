//! Countdown state machine
//!
//! Pure state: no clocks, no sound. [`IntervalTimer::tick`] reports when the
//! alarm is due and the caller decides what to do about it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// User-configurable timer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Always at least 1
    pub duration_seconds: u64,
    pub sound_path: Option<PathBuf>,
}

impl From<Settings> for TimerConfig {
    fn from(settings: Settings) -> Self {
        Self {
            duration_seconds: settings.timer_duration_seconds.max(1),
            sound_path: settings.alarm_sound_path,
        }
    }
}

impl From<&TimerConfig> for Settings {
    fn from(config: &TimerConfig) -> Self {
        Self {
            timer_duration_seconds: config.duration_seconds,
            alarm_sound_path: config.sound_path.clone(),
        }
    }
}

/// Countdown progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub running: bool,
    pub remaining_seconds: u64,
}

/// What a tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is not running; nothing changed
    Idle,
    /// One second was counted off
    Counted { remaining: u64 },
    /// The countdown had reached zero: ring the alarm. The countdown has
    /// already been reset to the full duration.
    Alarm { sound_path: Option<PathBuf> },
}

/// Point-in-time view published to listeners after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub running: bool,
    pub remaining_seconds: u64,
    pub duration_seconds: u64,
    /// Remaining time while running, configured duration while idle
    pub display_seconds: u64,
}

/// Repeating countdown: Idle <-> Running
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    config: TimerConfig,
    state: TimerState,
}

impl IntervalTimer {
    pub fn new(config: TimerConfig) -> Self {
        let state = TimerState {
            running: false,
            remaining_seconds: config.duration_seconds,
        };
        Self { config, state }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Begin counting down from the full duration.
    /// Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.state.running {
            return false;
        }
        self.state.running = true;
        self.state.remaining_seconds = self.config.duration_seconds;
        true
    }

    /// Return to idle with the full duration showing.
    /// Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.running = false;
        self.state.remaining_seconds = self.config.duration_seconds;
        true
    }

    /// Advance the countdown by one period.
    ///
    /// Zero is a visited state: the tick that finds the countdown at zero
    /// raises the alarm and restarts the interval.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }
        if self.state.remaining_seconds == 0 {
            self.state.remaining_seconds = self.config.duration_seconds;
            TickOutcome::Alarm {
                sound_path: self.config.sound_path.clone(),
            }
        } else {
            self.state.remaining_seconds -= 1;
            TickOutcome::Counted {
                remaining: self.state.remaining_seconds,
            }
        }
    }

    /// Change the interval length. Non-positive values are rejected.
    ///
    /// While idle the display follows immediately; while running the
    /// current countdown finishes first.
    pub fn set_duration(&mut self, seconds: i64) -> bool {
        let Ok(seconds) = u64::try_from(seconds) else {
            return false;
        };
        if seconds == 0 {
            return false;
        }
        self.config.duration_seconds = seconds;
        if !self.state.running {
            self.state.remaining_seconds = seconds;
        }
        true
    }

    pub fn set_sound_path(&mut self, path: Option<PathBuf>) {
        self.config.sound_path = path;
    }

    /// Seconds the user should see
    pub fn display_seconds(&self) -> u64 {
        if self.state.running {
            self.state.remaining_seconds
        } else {
            self.config.duration_seconds
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            running: self.state.running,
            remaining_seconds: self.state.remaining_seconds,
            duration_seconds: self.config.duration_seconds,
            display_seconds: self.display_seconds(),
        }
    }
}
