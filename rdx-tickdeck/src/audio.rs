//! Alert playback for the prayer view.
//!
//! Playback is delegated to an external player process. All state (the
//! running child) belongs to the player instance; there is no process-wide
//! flag.

use crate::config::{AudioConfig, PlayerCommand};
use anyhow::{bail, Context};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Something that can sound the prayer alert.
pub trait AlertPlayer: Send + Sync {
    /// Starts playback without blocking. A call while already playing is a no-op.
    fn play(&self) -> anyhow::Result<()>;
    fn stop(&self);
    fn is_playing(&self) -> bool;
}

/// Builds the player described by the configuration.
pub fn from_config(config: &AudioConfig) -> Arc<dyn AlertPlayer> {
    match &config.file {
        Some(file) => Arc::new(CommandPlayer::new(file.clone(), config.players.clone())),
        None => Arc::new(TerminalBell),
    }
}

/// Plays a file through the first external player that starts.
pub struct CommandPlayer {
    file: PathBuf,
    players: Vec<PlayerCommand>,
    child: Mutex<Option<Child>>,
}

impl CommandPlayer {
    pub fn new(file: PathBuf, players: Vec<PlayerCommand>) -> Self {
        Self {
            file,
            players,
            child: Mutex::new(None),
        }
    }

    fn child(&self) -> MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn(&self) -> anyhow::Result<Child> {
        for player in &self.players {
            let spawned = Command::new(&player.program)
                .args(&player.args)
                .arg(&self.file)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(child) => {
                    debug!("Playing {} with {}", self.file.display(), player.program);
                    return Ok(child);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to start {}", player.program))
                }
            }
        }
        bail!("no audio player available for {}", self.file.display())
    }
}

/// Returns `true` if the child in the slot is still running, clearing
/// the slot once it has exited.
fn still_running(slot: &mut Option<Child>) -> bool {
    let running = match slot.as_mut() {
        Some(child) => matches!(child.try_wait(), Ok(None)),
        None => false,
    };
    if !running {
        *slot = None;
    }
    running
}

impl AlertPlayer for CommandPlayer {
    fn play(&self) -> anyhow::Result<()> {
        let mut slot = self.child();
        if still_running(&mut slot) {
            return Ok(());
        }
        if !self.file.exists() {
            bail!("audio file {} not found", self.file.display());
        }
        *slot = Some(self.spawn()?);
        Ok(())
    }

    fn stop(&self) {
        if let Some(mut child) = self.child().take() {
            if let Err(e) = child.kill() {
                debug!("Player already exited: {}", e);
            }
            let _ = child.wait();
        }
    }

    fn is_playing(&self) -> bool {
        still_running(&mut self.child())
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Rings the terminal bell. Used when no audio file is configured.
pub struct TerminalBell;

impl AlertPlayer for TerminalBell {
    fn play(&self) -> anyhow::Result<()> {
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!("Could not ring the terminal bell: {}", e);
        }
        Ok(())
    }

    fn stop(&self) {}

    fn is_playing(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let player = CommandPlayer::new(
            PathBuf::from("/nonexistent/azan.mp3"),
            vec![PlayerCommand::new("mpv", &[])],
        );
        assert!(player.play().is_err());
        assert!(!player.is_playing());
    }

    #[test]
    fn no_installed_player_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let player = CommandPlayer::new(
            file.path().to_path_buf(),
            vec![PlayerCommand::new("tickdeck-no-such-player", &[])],
        );
        let err = player.play().unwrap_err();
        assert!(err.to_string().contains("no audio player"));
    }

    #[cfg(unix)]
    #[test]
    fn playback_does_not_overlap_and_stops() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // The file lands in `$1`, which the script ignores.
        let player = CommandPlayer::new(
            file.path().to_path_buf(),
            vec![PlayerCommand::new("sh", &["-c", "sleep 5", "player"])],
        );
        player.play().unwrap();
        assert!(player.is_playing());
        player.play().unwrap();
        player.stop();
        assert!(!player.is_playing());
    }

    #[test]
    fn bell_never_reports_playing() {
        let bell = TerminalBell;
        bell.play().unwrap();
        assert!(!bell.is_playing());
    }
}
