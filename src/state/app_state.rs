//! Main application state management

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{IntervalTimer, TickOutcome, TimerConfig, TimerSnapshot};
use crate::{
    services::{SoundPlayer, SoundSupervisor},
    settings::{Settings, SettingsStore},
    tasks::RepeatingTimer,
    utils::{format_hms, parse_hms},
};

/// Period of the countdown tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Application state: the countdown, its tick schedule, the alarm sound
/// and the settings they are persisted to
pub struct AppState {
    /// Countdown state machine
    timer: Mutex<IntervalTimer>,
    /// Live tick schedule while running
    ticker: Mutex<Option<RepeatingTimer>>,
    tick_period: Duration,
    /// Alarm playback
    pub sound: SoundSupervisor,
    settings: Arc<dyn SettingsStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Published after every start, stop, tick and duration change
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
}

impl AppState {
    /// Create the state from persisted settings
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        player: Arc<dyn SoundPlayer>,
        port: u16,
        host: String,
    ) -> Self {
        let config = TimerConfig::from(settings.load());
        info!(
            "Loaded settings: duration={}, sound={:?}",
            format_hms(config.duration_seconds as i64),
            config.sound_path
        );

        let timer = IntervalTimer::new(config);
        let (timer_update_tx, _) = watch::channel(timer.snapshot());

        Self {
            timer: Mutex::new(timer),
            ticker: Mutex::new(None),
            tick_period: TICK_PERIOD,
            sound: SoundSupervisor::new(player),
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
        }
    }

    /// Use a different tick period
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, IntervalTimer>, String> {
        self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    fn lock_ticker(&self) -> Result<MutexGuard<'_, Option<RepeatingTimer>>, String> {
        self.ticker.lock()
            .map_err(|e| format!("Failed to lock tick schedule: {}", e))
    }

    /// Start counting down. Does nothing if already running.
    pub fn start(self: &Arc<Self>) -> Result<TimerSnapshot, String> {
        let mut timer = self.lock_timer()?;
        if !timer.start() {
            debug!("Start requested while already running");
            return Ok(timer.snapshot());
        }

        let state = Arc::downgrade(self);
        let ticker = RepeatingTimer::start(self.tick_period, move || {
            if let Some(state) = state.upgrade() {
                if let Err(e) = state.tick() {
                    error!("Timer tick failed: {}", e);
                }
            }
        });
        if let Some(stale) = self.lock_ticker()?.replace(ticker) {
            stale.cancel();
        }

        let snapshot = timer.snapshot();
        drop(timer);

        info!("Timer started, alarm every {}", format_hms(snapshot.duration_seconds as i64));
        self.record_action("start");
        self.publish(snapshot);
        Ok(snapshot)
    }

    /// Stop counting down and silence the alarm. Does nothing if idle.
    pub fn stop(&self) -> Result<TimerSnapshot, String> {
        let mut timer = self.lock_timer()?;
        if !timer.stop() {
            debug!("Stop requested while idle");
            return Ok(timer.snapshot());
        }

        if let Some(ticker) = self.lock_ticker()?.take() {
            ticker.cancel();
        }
        self.sound.stop();

        let snapshot = timer.snapshot();
        drop(timer);

        info!("Timer stopped");
        self.record_action("stop");
        self.publish(snapshot);
        Ok(snapshot)
    }

    /// Advance the countdown by one period, ringing the alarm when due
    pub fn tick(&self) -> Result<TickOutcome, String> {
        let mut timer = self.lock_timer()?;
        let outcome = timer.tick();

        // Sound is dispatched under the timer lock so a concurrent stop
        // cannot be overtaken by this alarm.
        if let TickOutcome::Alarm { sound_path } = &outcome {
            info!("Interval elapsed, ringing alarm");
            self.sound.stop();
            self.sound.play(sound_path.clone());
        }

        let snapshot = timer.snapshot();
        drop(timer);

        if outcome != TickOutcome::Idle {
            self.publish(snapshot);
        }
        Ok(outcome)
    }

    /// Set the interval length in seconds. Returns false if rejected.
    pub fn set_duration(&self, seconds: i64) -> Result<bool, String> {
        let mut timer = self.lock_timer()?;
        if !timer.set_duration(seconds) {
            info!("Rejected duration of {} seconds", seconds);
            return Ok(false);
        }
        let settings = Settings::from(timer.config());
        let snapshot = timer.snapshot();
        drop(timer);

        info!("Duration set to {}", format_hms(seconds));
        self.persist(&settings);
        self.record_action("set-duration");
        self.publish(snapshot);
        Ok(true)
    }

    /// Set the interval length from `S`, `M:S` or `H:M:S` text.
    /// Returns false if the text is not a valid, non-zero duration.
    pub fn set_duration_text(&self, text: &str) -> Result<bool, String> {
        let seconds = parse_hms(text);
        if seconds == 0 {
            info!("Rejected duration {:?}", text);
            return Ok(false);
        }
        self.set_duration(i64::try_from(seconds).unwrap_or(0))
    }

    /// Set or clear the alarm sound file
    pub fn set_sound_path(&self, path: Option<PathBuf>) -> Result<(), String> {
        let mut timer = self.lock_timer()?;
        timer.set_sound_path(path);
        let settings = Settings::from(timer.config());
        drop(timer);

        info!("Alarm sound set to {:?}", settings.alarm_sound_path);
        self.persist(&settings);
        self.record_action("set-sound");
        Ok(())
    }

    /// Remaining seconds while running, configured duration while idle
    pub fn display_seconds(&self) -> Result<u64, String> {
        Ok(self.lock_timer()?.display_seconds())
    }

    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        Ok(self.lock_timer()?.snapshot())
    }

    pub fn config(&self) -> Result<TimerConfig, String> {
        Ok(self.lock_timer()?.config().clone())
    }

    /// Receive a snapshot after every timer change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Whether an alarm playback attempt is live
    pub fn playback_active(&self) -> bool {
        self.sound.is_active()
    }

    /// Cancel the tick schedule and silence the alarm, whatever the state
    pub fn shutdown(&self) {
        let ticker = match self.ticker.lock() {
            Ok(mut ticker) => ticker.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(ticker) = ticker {
            ticker.cancel();
        }
        self.sound.stop();
        info!("Timer shut down");
    }

    fn persist(&self, settings: &Settings) {
        if let Err(e) = self.settings.save(settings) {
            warn!("Failed to save settings: {:#}", e);
        }
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        self.timer_update_tx.send_replace(snapshot);
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
