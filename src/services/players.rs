//! Platform sound players
//!
//! A `SoundPlayer` knows how to start one sound on this platform and how to
//! silence it again. Processes are launched from `tokio::process` so the
//! runtime reaps them after they are killed.

use std::{
    env,
    fmt,
    io,
    path::{Path, PathBuf},
    process::Stdio,
    sync::Arc,
};

use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Reasons a playback attempt could not be started
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("no sound player found (tried: {0})")]
    PlayerNotFound(String),

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("system sound call failed: {0}")]
    Native(String),

    #[error("sound playback is not supported on this platform")]
    Unsupported,
}

/// One in-flight sound
pub enum PlaybackHandle {
    /// External player process
    Process(Child),
    /// Sound queued with the OS asynchronous sound API
    SystemAsync,
}

impl fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackHandle::Process(child) => f
                .debug_tuple("Process")
                .field(&child.id())
                .finish(),
            PlaybackHandle::SystemAsync => f.write_str("SystemAsync"),
        }
    }
}

/// Platform capability for making and silencing alarm sounds
pub trait SoundPlayer: Send + Sync {
    fn name(&self) -> &str;

    /// Start playing an audio file
    fn launch_file(&self, path: &Path) -> Result<PlaybackHandle, SoundError>;

    /// Start playing the platform's default alert sound
    fn launch_alert(&self) -> Result<PlaybackHandle, SoundError>;

    /// Cancel whatever the OS asynchronous sound API is playing
    fn purge(&self) {}

    /// Candidate programs and whether each one resolves on this system
    fn probe(&self) -> Vec<(String, bool)> {
        Vec::new()
    }

    /// Forcibly stop a playback. Failures are logged and dropped.
    fn terminate(&self, handle: PlaybackHandle) {
        match handle {
            PlaybackHandle::Process(mut child) => {
                if let Err(e) = child.start_kill() {
                    debug!("Failed to kill sound player process: {}", e);
                }
            }
            PlaybackHandle::SystemAsync => self.purge(),
        }
    }
}

/// A command line audio player and its fixed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn spawn(&self, file: Option<&Path>) -> io::Result<Child> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(file) = file {
            command.arg(file);
        }
        command.spawn()
    }
}

/// Plays sounds by launching the first available command line player
#[derive(Debug, Clone)]
pub struct ExternalProcessPlayer {
    name: String,
    file_players: Vec<PlayerCommand>,
    alert_players: Vec<PlayerCommand>,
}

impl ExternalProcessPlayer {
    /// `file_players` receive the sound file as their last argument;
    /// `alert_players` are run exactly as given.
    pub fn new(
        name: &str,
        file_players: Vec<PlayerCommand>,
        alert_players: Vec<PlayerCommand>,
    ) -> Self {
        Self {
            name: name.to_string(),
            file_players,
            alert_players,
        }
    }

    pub fn linux() -> Self {
        Self::new(
            "linux-cli",
            vec![
                PlayerCommand::new("play", &[]),
                PlayerCommand::new("paplay", &[]),
                PlayerCommand::new("aplay", &[]),
            ],
            vec![
                PlayerCommand::new("canberra-gtk-play", &["-i", "bell"]),
                PlayerCommand::new(
                    "paplay",
                    &["/usr/share/sounds/freedesktop/stereo/complete.oga"],
                ),
                PlayerCommand::new("aplay", &["/usr/share/sounds/alsa/Front_Center.wav"]),
            ],
        )
    }

    pub fn macos() -> Self {
        Self::new(
            "afplay",
            vec![PlayerCommand::new("afplay", &[])],
            vec![PlayerCommand::new(
                "afplay",
                &["/System/Library/Sounds/Glass.aiff"],
            )],
        )
    }

    /// Try each candidate in order. Only a missing program moves on to the
    /// next one; any other launch error ends the attempt.
    fn launch_first(
        candidates: &[PlayerCommand],
        file: Option<&Path>,
    ) -> Result<PlaybackHandle, SoundError> {
        for candidate in candidates {
            match candidate.spawn(file) {
                Ok(child) => {
                    debug!(
                        "Launched {} (pid {:?})",
                        candidate.program,
                        child.id()
                    );
                    return Ok(PlaybackHandle::Process(child));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("{} not found, trying next player", candidate.program);
                }
                Err(e) => {
                    return Err(SoundError::Launch {
                        program: candidate.program.clone(),
                        source: e,
                    });
                }
            }
        }

        let tried: Vec<&str> = candidates.iter().map(|c| c.program.as_str()).collect();
        Err(SoundError::PlayerNotFound(tried.join(", ")))
    }
}

impl SoundPlayer for ExternalProcessPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn launch_file(&self, path: &Path) -> Result<PlaybackHandle, SoundError> {
        Self::launch_first(&self.file_players, Some(path))
    }

    fn launch_alert(&self) -> Result<PlaybackHandle, SoundError> {
        Self::launch_first(&self.alert_players, None)
    }

    fn probe(&self) -> Vec<(String, bool)> {
        let mut seen = Vec::new();
        for candidate in self.file_players.iter().chain(&self.alert_players) {
            if !seen.iter().any(|(name, _)| name == &candidate.program) {
                seen.push((candidate.program.clone(), find_in_path(&candidate.program).is_some()));
            }
        }
        seen
    }
}

/// Plays sounds through the Windows `PlaySound` API
#[cfg(windows)]
#[derive(Debug, Clone, Default)]
pub struct NativeAsyncSound;

#[cfg(windows)]
impl NativeAsyncSound {
    /// Alias of the system alert played when no file is configured
    const ALERT_ALIAS: &'static str = "SystemHand";

    fn play_sound(
        sound: &std::ffi::OsStr,
        flags: windows::Win32::Media::Audio::SND_FLAGS,
    ) -> Result<(), SoundError> {
        use std::os::windows::ffi::OsStrExt;
        use windows::{core::PCWSTR, Win32::Foundation::HMODULE, Win32::Media::Audio::PlaySoundW};

        let wide: Vec<u16> = sound.encode_wide().chain(std::iter::once(0)).collect();
        let ok = unsafe { PlaySoundW(PCWSTR(wide.as_ptr()), HMODULE::default(), flags) };
        if ok.as_bool() {
            Ok(())
        } else {
            Err(SoundError::Native(format!("PlaySound({:?}) returned false", sound)))
        }
    }
}

#[cfg(windows)]
impl SoundPlayer for NativeAsyncSound {
    fn name(&self) -> &str {
        "winmm"
    }

    fn launch_file(&self, path: &Path) -> Result<PlaybackHandle, SoundError> {
        use windows::Win32::Media::Audio::{SND_ASYNC, SND_FILENAME};

        Self::play_sound(path.as_os_str(), SND_FILENAME | SND_ASYNC)?;
        Ok(PlaybackHandle::SystemAsync)
    }

    fn launch_alert(&self) -> Result<PlaybackHandle, SoundError> {
        use windows::Win32::Media::Audio::{SND_ALIAS, SND_ASYNC};

        Self::play_sound(std::ffi::OsStr::new(Self::ALERT_ALIAS), SND_ALIAS | SND_ASYNC)?;
        Ok(PlaybackHandle::SystemAsync)
    }

    fn purge(&self) {
        use windows::{
            core::PCWSTR,
            Win32::Foundation::HMODULE,
            Win32::Media::Audio::{PlaySoundW, SND_PURGE},
        };

        let ok = unsafe { PlaySoundW(PCWSTR::null(), HMODULE::default(), SND_PURGE) };
        if !ok.as_bool() {
            debug!("PlaySound purge returned false");
        }
    }
}

/// Player with nothing to launch, for platforms without a known player
#[derive(Debug, Clone, Default)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn name(&self) -> &str {
        "silent"
    }

    fn launch_file(&self, _path: &Path) -> Result<PlaybackHandle, SoundError> {
        Err(SoundError::Unsupported)
    }

    fn launch_alert(&self) -> Result<PlaybackHandle, SoundError> {
        Err(SoundError::Unsupported)
    }
}

/// Pick the player for the platform this binary was built for
pub fn default_player() -> Arc<dyn SoundPlayer> {
    #[cfg(windows)]
    {
        Arc::new(NativeAsyncSound)
    }
    #[cfg(target_os = "macos")]
    {
        Arc::new(ExternalProcessPlayer::macos())
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Arc::new(ExternalProcessPlayer::linux())
    }
    #[cfg(not(any(windows, unix)))]
    {
        Arc::new(SilentPlayer)
    }
}

/// Log which player programs are usable. Never fails startup.
pub fn log_available_players(player: &dyn SoundPlayer) {
    info!("Sound player: {}", player.name());
    let probed = player.probe();
    for (program, found) in &probed {
        if *found {
            info!("  {} available", program);
        } else {
            debug!("  {} not found", program);
        }
    }
    if !probed.is_empty() && probed.iter().all(|(_, found)| !found) {
        warn!("No sound player found on PATH, alarms will be silent");
    }
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
