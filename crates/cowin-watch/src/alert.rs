//! Alert sink: writes the matching centers and plays an audible alert.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use cowin_api::Center;

use super::error::WatchError;

/// Which alert to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSound {
    /// Bookable sessions were found.
    Match,
    /// The watcher stopped on a fatal error.
    Fatal,
}

/// Capability that starts an audible alert.
pub trait AlertPlayer {
    /// Starts playing `sound` and returns without waiting for it to end.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play(&self, sound: AlertSound) -> Result<()>;
}

impl<T: AlertPlayer + ?Sized> AlertPlayer for &T {
    fn play(&self, sound: AlertSound) -> Result<()> {
        (**self).play(sound)
    }
}

/// Plays alerts through an external media player in loop mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPlayer {
    /// Player executable.
    program: String,
    /// Asset played on a match.
    match_asset: PathBuf,
    /// Asset played on a fatal error.
    fatal_asset: PathBuf,
}

impl MediaPlayer {
    /// Platform player executable.
    pub const DEFAULT_PROGRAM: &str = if cfg!(windows) { "vlc.exe" } else { "vlc" };

    /// Creates a player.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        match_asset: impl Into<PathBuf>,
        fatal_asset: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            match_asset: match_asset.into(),
            fatal_asset: fatal_asset.into(),
        }
    }

    /// Player executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Audio file used for `sound`.
    #[must_use]
    pub fn asset(&self, sound: AlertSound) -> &Path {
        match sound {
            AlertSound::Match => &self.match_asset,
            AlertSound::Fatal => &self.fatal_asset,
        }
    }

    /// Builds the looping playback command for `sound`.
    fn command(&self, sound: AlertSound) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--loop")
            .arg(self.asset(sound))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl AlertPlayer for MediaPlayer {
    // The child is never waited on; it loops until the user closes it.
    #[allow(clippy::zombie_processes)]
    fn play(&self, sound: AlertSound) -> Result<()> {
        let child = self
            .command(sound)
            .spawn()
            .with_context(|| format!("failed to start {}", self.program))?;
        tracing::debug!(
            pid = child.id(),
            program = %self.program,
            asset = %self.asset(sound).display(),
            "Alert playback started"
        );
        Ok(())
    }
}

/// Destination of alert batches and fatal errors.
#[derive(Debug)]
pub struct AlertSink<P> {
    /// File overwritten with every alert batch.
    output_file: PathBuf,
    /// Audible alert capability.
    player: P,
}

impl<P: AlertPlayer> AlertSink<P> {
    /// Creates a sink writing to `output_file`.
    pub fn new(output_file: impl Into<PathBuf>, player: P) -> Self {
        Self {
            output_file: output_file.into(),
            player,
        }
    }

    /// Output file path.
    #[must_use]
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Overwrites the output file with `batch`, then plays the match alert.
    ///
    /// A player that fails to start is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::Serialize` or `WatchError::Output` if the batch
    /// cannot be written.
    pub fn on_match(&self, batch: &[Center]) -> Result<(), WatchError> {
        let json = serde_json::to_vec_pretty(batch).map_err(WatchError::Serialize)?;
        std::fs::write(&self.output_file, json).map_err(|source| WatchError::Output {
            path: self.output_file.clone(),
            source,
        })?;
        tracing::info!(
            centers = batch.len(),
            path = %self.output_file.display(),
            "Alert batch written"
        );

        if let Err(e) = self.player.play(AlertSound::Match) {
            tracing::warn!(error = %format!("{e:#}"), "Failed to play match alert");
        }
        Ok(())
    }

    /// Reports a fatal error and plays the error alert.
    ///
    /// Nothing is written to the output file.
    pub fn on_fatal_error(&self, error: &anyhow::Error) {
        tracing::error!("{error:#}");
        tracing::error!("*****  RESTART THE PROGRAM  *****");

        if let Err(e) = self.player.play(AlertSound::Fatal) {
            tracing::warn!(error = %format!("{e:#}"), "Failed to play error alert");
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::cell::RefCell;

    use serde_json::{Map, Value};

    use super::*;

    /// Player that records what it was asked to play.
    #[derive(Default)]
    struct RecordingPlayer {
        played: RefCell<Vec<AlertSound>>,
    }

    impl AlertPlayer for RecordingPlayer {
        fn play(&self, sound: AlertSound) -> Result<()> {
            self.played.borrow_mut().push(sound);
            Ok(())
        }
    }

    /// Player that can never start.
    struct BrokenPlayer;

    impl AlertPlayer for BrokenPlayer {
        fn play(&self, _sound: AlertSound) -> Result<()> {
            anyhow::bail!("no audio device")
        }
    }

    fn batch() -> Vec<Center> {
        vec![Center {
            center_id: 561_660,
            name: String::from("City Hospital"),
            address: String::from("City Hospital, Sector 5"),
            sessions: Vec::new(),
            extra: Map::new(),
        }]
    }

    #[test]
    fn test_default_program_matches_platform() {
        // Arrange & Act & Assert
        if cfg!(windows) {
            assert_eq!(MediaPlayer::DEFAULT_PROGRAM, "vlc.exe");
        } else {
            assert_eq!(MediaPlayer::DEFAULT_PROGRAM, "vlc");
        }
    }

    #[test]
    fn test_media_player_command_loops_asset() {
        // Arrange
        let player = MediaPlayer::new("vlc", "alert.mp3", "error.mp3");

        // Act
        let cmd = player.command(AlertSound::Fatal);

        // Assert
        assert_eq!(cmd.get_program(), "vlc");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["--loop", "error.mp3"]);
    }

    #[test]
    fn test_media_player_missing_program_is_error() {
        // Arrange
        let player = MediaPlayer::new("cowin-alert-no-such-player", "alert.mp3", "error.mp3");

        // Act
        let result = player.play(AlertSound::Match);

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("cowin-alert-no-such-player")
        );
    }

    #[test]
    fn test_on_match_overwrites_file_and_plays() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vaccine_available.json");
        std::fs::write(&path, "previous content that is much longer than the new one").unwrap();
        let player = RecordingPlayer::default();
        let sink = AlertSink::new(&path, &player);

        // Act
        sink.on_match(&batch()).unwrap();

        // Assert
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 1);
        assert_eq!(written[0]["center_id"], 561_660);
        assert_eq!(*player.played.borrow(), vec![AlertSound::Match]);
    }

    #[test]
    fn test_on_match_unwritable_path_is_output_error() {
        // Arrange: a directory cannot be written as a file
        let dir = tempfile::tempdir().unwrap();
        let player = RecordingPlayer::default();
        let sink = AlertSink::new(dir.path(), &player);

        // Act
        let result = sink.on_match(&batch());

        // Assert
        assert!(matches!(result, Err(WatchError::Output { .. })));
        assert!(player.played.borrow().is_empty());
    }

    #[test]
    fn test_on_match_tolerates_player_failure() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let sink = AlertSink::new(&path, BrokenPlayer);

        // Act
        let result = sink.on_match(&batch());

        // Assert
        assert!(result.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_on_fatal_error_plays_error_sound_without_writing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let player = RecordingPlayer::default();
        let sink = AlertSink::new(&path, &player);
        let error = anyhow::anyhow!("state 'Atlantis' not found");

        // Act
        sink.on_fatal_error(&error);

        // Assert
        assert_eq!(*player.played.borrow(), vec![AlertSound::Fatal]);
        assert!(!path.exists());
    }
}
