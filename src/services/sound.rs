//! Alarm playback supervision
//!
//! At most one playback attempt is live at a time. Starting a new attempt
//! first stops the previous one, and an attempt whose launch finishes after
//! it was superseded or stopped silences itself instead of taking the slot.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, info, warn};

use super::players::{PlaybackHandle, SoundPlayer};

/// Identifier of one call to [`SoundSupervisor::play`]
pub type AttemptId = u64;

#[derive(Debug)]
struct Attempt {
    id: AttemptId,
    /// `None` while the player is still being launched
    handle: Option<PlaybackHandle>,
}

#[derive(Debug, Default)]
struct Slot {
    last_id: AttemptId,
    current: Option<Attempt>,
}

/// Owns the single playback slot
#[derive(Clone)]
pub struct SoundSupervisor {
    player: Arc<dyn SoundPlayer>,
    slot: Arc<Mutex<Slot>>,
    /// Serializes launches so they reach the player in attempt order
    launch_lock: Arc<Mutex<()>>,
}

impl SoundSupervisor {
    pub fn new(player: Arc<dyn SoundPlayer>) -> Self {
        Self {
            player,
            slot: Arc::new(Mutex::new(Slot::default())),
            launch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn player_name(&self) -> &str {
        self.player.name()
    }

    /// Stop whatever is playing. Safe to call at any time.
    pub fn stop(&self) {
        let mut slot = lock(&self.slot);
        Self::stop_locked(self.player.as_ref(), &mut slot);
    }

    /// Stop any current sound, then start a new one in the background.
    ///
    /// A configured file that exists is tried first; otherwise, or if the
    /// file cannot be played, the platform alert sound is used. Failures
    /// are logged and never returned.
    pub fn play(&self, path: Option<PathBuf>) -> AttemptId {
        let attempt = {
            let mut slot = lock(&self.slot);
            Self::stop_locked(self.player.as_ref(), &mut slot);
            slot.last_id += 1;
            let id = slot.last_id;
            slot.current = Some(Attempt { id, handle: None });
            id
        };
        debug!("Starting playback attempt {}", attempt);

        let player = Arc::clone(&self.player);
        let slot = Arc::clone(&self.slot);
        let launch_lock = Arc::clone(&self.launch_lock);

        // Detached; the join handle is never awaited.
        tokio::task::spawn_blocking(move || {
            let _launching = lock(&launch_lock);
            if !is_current(&slot, attempt) {
                debug!("Playback attempt {} superseded before launch", attempt);
                return;
            }
            let launched = launch(player.as_ref(), path.as_deref());
            settle(player.as_ref(), &slot, attempt, launched);
        });

        attempt
    }

    /// Whether a playback attempt is live (launching or playing)
    pub fn is_active(&self) -> bool {
        lock(&self.slot).current.is_some()
    }

    /// Id of the live attempt, if any
    pub fn active_attempt(&self) -> Option<AttemptId> {
        lock(&self.slot).current.as_ref().map(|a| a.id)
    }

    /// Whether the live attempt has a launched player behind it
    pub fn is_sounding(&self) -> bool {
        lock(&self.slot)
            .current
            .as_ref()
            .is_some_and(|a| a.handle.is_some())
    }

    fn stop_locked(player: &dyn SoundPlayer, slot: &mut Slot) {
        if let Some(attempt) = slot.current.take() {
            match attempt.handle {
                Some(handle) => {
                    debug!("Stopping playback attempt {} ({:?})", attempt.id, handle);
                    player.terminate(handle);
                }
                None => debug!("Cancelling playback attempt {} before launch", attempt.id),
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_current(slot: &Mutex<Slot>, attempt: AttemptId) -> bool {
    lock(slot).current.as_ref().is_some_and(|a| a.id == attempt)
}

/// Try the configured file, then the platform alert
fn launch(player: &dyn SoundPlayer, path: Option<&Path>) -> Option<PlaybackHandle> {
    match path {
        Some(path) if path.exists() => match player.launch_file(path) {
            Ok(handle) => {
                info!("Playing alarm sound {:?}", path);
                return Some(handle);
            }
            Err(e) => debug!("Could not play {:?}: {}, using alert sound", path, e),
        },
        Some(path) => debug!("Sound file {:?} does not exist, using alert sound", path),
        None => {}
    }

    match player.launch_alert() {
        Ok(handle) => {
            info!("Playing alert sound");
            Some(handle)
        }
        Err(e) => {
            warn!("Failed to play alert sound: {}", e);
            None
        }
    }
}

/// Hand a finished launch to the slot, or silence it if it lost the race
fn settle(
    player: &dyn SoundPlayer,
    slot: &Mutex<Slot>,
    attempt: AttemptId,
    launched: Option<PlaybackHandle>,
) {
    let mut slot = lock(slot);
    let still_current = slot.current.as_ref().is_some_and(|a| a.id == attempt);
    match (still_current, launched) {
        (true, Some(handle)) => {
            if let Some(current) = slot.current.as_mut() {
                current.handle = Some(handle);
            }
        }
        (true, None) => slot.current = None,
        (false, Some(handle)) => {
            debug!("Playback attempt {} superseded after launch", attempt);
            player.terminate(handle);
        }
        (false, None) => {}
    }
}
