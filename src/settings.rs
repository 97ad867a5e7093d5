//! Persisted timer settings
//!
//! The timer core only needs a plain load/save gateway. `JsonFileStore`
//! keeps the record in a small JSON file and never lets a missing or
//! corrupt file reach the caller as an error.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Duration used when nothing valid has been saved
pub const DEFAULT_DURATION_SECONDS: u64 = 60;

/// Settings record shared with the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_duration", deserialize_with = "lenient_duration")]
    pub timer_duration_seconds: u64,
    #[serde(default, deserialize_with = "lenient_sound_path")]
    pub alarm_sound_path: Option<PathBuf>,
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_SECONDS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_duration_seconds: DEFAULT_DURATION_SECONDS,
            alarm_sound_path: None,
        }
    }
}

/// Any stored duration that is not a positive whole number becomes the default.
/// Only this field is replaced; the rest of the record still loads.
fn lenient_duration<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value.as_u64() {
        Some(seconds) if seconds > 0 => Ok(seconds),
        _ => {
            warn!(
                "Stored duration {} is not usable, using default of {}s",
                value, DEFAULT_DURATION_SECONDS
            );
            Ok(DEFAULT_DURATION_SECONDS)
        }
    }
}

/// A sound path that is not a string is dropped, falling back to the alert
fn lenient_sound_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::String(path) if path.is_empty() => Ok(None),
        Value::String(path) => Ok(Some(PathBuf::from(path))),
        other => {
            warn!("Stored sound path {} is not a string, ignoring it", other);
            Ok(None)
        }
    }
}

/// Gateway through which the timer loads and saves its settings
pub trait SettingsStore: Send + Sync {
    /// Load settings, falling back to defaults on any failure
    fn load(&self) -> Settings;

    /// Persist settings
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings stored as JSON at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file at {:?}", self.path))?;
        let settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings file at {:?}", self.path))?;
        Ok(Some(settings))
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(settings)) => {
                debug!("Loaded settings from {:?}", self.path);
                settings
            }
            Ok(None) => {
                debug!("No settings file at {:?}, using defaults", self.path);
                Settings::default()
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings file at {:?}", self.path))?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("timer_settings.json"))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.load(), Settings::default());
        assert_eq!(store.load().timer_duration_seconds, 60);
        assert!(store.load().alarm_sound_path.is_none());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let settings = Settings {
            timer_duration_seconds: 1500,
            alarm_sound_path: Some(PathBuf::from("/tmp/bell.wav")),
        };

        store.save(&settings).unwrap();

        assert_eq!(store.load(), settings);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"alarm_sound_path": "/tmp/a.ogg"}"#).unwrap();

        let settings = store.load();
        assert_eq!(settings.timer_duration_seconds, DEFAULT_DURATION_SECONDS);
        assert_eq!(settings.alarm_sound_path, Some(PathBuf::from("/tmp/a.ogg")));
    }

    #[test]
    fn unusable_duration_is_replaced_without_losing_sound_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for duration in ["0", "-5", "\"90\"", "90.5", "null", "[1]"] {
            let json = format!(
                r#"{{"timer_duration_seconds": {}, "alarm_sound_path": "/tmp/bell.wav"}}"#,
                duration
            );
            fs::write(store.path(), json).unwrap();

            let settings = store.load();
            assert_eq!(settings.timer_duration_seconds, DEFAULT_DURATION_SECONDS, "{}", duration);
            assert_eq!(settings.alarm_sound_path, Some(PathBuf::from("/tmp/bell.wav")));
        }
    }

    #[test]
    fn unusable_sound_path_is_dropped_without_losing_duration() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"timer_duration_seconds": 300, "alarm_sound_path": 42}"#,
        )
        .unwrap();

        let settings = store.load();
        assert_eq!(settings.timer_duration_seconds, 300);
        assert_eq!(settings.alarm_sound_path, None);
    }

    #[test]
    fn reads_file_written_with_original_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"timer_duration_seconds": 300, "alarm_sound_path": null}"#,
        )
        .unwrap();

        assert_eq!(
            store.load(),
            Settings {
                timer_duration_seconds: 300,
                alarm_sound_path: None,
            }
        );
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope").join("settings.json"));

        assert!(store.save(&Settings::default()).is_err());
    }
}
