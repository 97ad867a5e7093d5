//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use interval_chime::{
    services::{PlaybackHandle, SoundError, SoundPlayer},
    AppState, Settings, SettingsStore,
};

/// Player that records launches and purges instead of making noise
#[derive(Default)]
pub struct RecordingPlayer {
    events: Mutex<Vec<String>>,
}

impl RecordingPlayer {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl SoundPlayer for RecordingPlayer {
    fn name(&self) -> &str {
        "recording"
    }

    fn launch_file(&self, path: &Path) -> Result<PlaybackHandle, SoundError> {
        self.record(format!("file:{}", path.display()));
        Ok(PlaybackHandle::SystemAsync)
    }

    fn launch_alert(&self) -> Result<PlaybackHandle, SoundError> {
        self.record("alert".to_string());
        Ok(PlaybackHandle::SystemAsync)
    }

    fn purge(&self) {
        self.record("purge".to_string());
    }
}

/// In-memory settings gateway that remembers every save
#[derive(Default)]
pub struct MemoryStore {
    pub initial: Settings,
    pub saved: Mutex<Vec<Settings>>,
}

impl MemoryStore {
    pub fn with(initial: Settings) -> Self {
        Self {
            initial,
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn saves(&self) -> Vec<Settings> {
        self.saved.lock().unwrap().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Settings {
        self.initial.clone()
    }

    fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        self.saved.lock().unwrap().push(settings.clone());
        Ok(())
    }
}

pub struct Harness {
    pub state: Arc<AppState>,
    pub player: Arc<RecordingPlayer>,
    pub store: Arc<MemoryStore>,
}

/// AppState whose own schedule never fires during a test; ticks are driven
/// by hand.
pub fn harness(duration_seconds: u64) -> Harness {
    harness_with_period(duration_seconds, Duration::from_secs(3600))
}

pub fn harness_with_period(duration_seconds: u64, period: Duration) -> Harness {
    let player = Arc::new(RecordingPlayer::default());
    let store = Arc::new(MemoryStore::with(Settings {
        timer_duration_seconds: duration_seconds,
        alarm_sound_path: None,
    }));
    let state = Arc::new(
        AppState::new(store.clone(), player.clone(), 0, "127.0.0.1".to_string())
            .with_tick_period(period),
    );
    Harness { state, player, store }
}

pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
