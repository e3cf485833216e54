//! Recording session owning the shell cassette recorder.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::recorder::CassetteRecorder;
use crate::exec::{self, Invocation};

/// Manages the `CassetteRecorder` for one recording session.
///
/// Cassettes are stored in a timestamped directory under the record root.
pub struct RecordingSession {
    /// Recorder for shell interactions.
    pub shell: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing the cassette file.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session at `<root>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn new(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let host = host_name();
        let path = output_dir.join("shell.cassette.yaml");
        let recorder = CassetteRecorder::new(path, format!("{timestamp}-shell"), host);

        Ok(Self { shell: Arc::new(Mutex::new(recorder)), output_dir })
    }

    /// Directory the cassette is written into.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish the recorder and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if a recording adapter still holds the recorder or
    /// the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.shell)
            .map_err(|_| "Recording adapter for shell still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for shell poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write shell cassette: {e}"))?;
        Ok(self.output_dir)
    }
}

/// Get the node name of this host, or "unknown" with a warning if unavailable.
fn host_name() -> String {
    let name = exec::run_to_completion(&Invocation::new("uname -n"))
        .ok()
        .filter(crate::ports::ShellOutput::success)
        .map(|o| o.stdout.trim().to_string())
        .filter(|s| !s.is_empty());

    if let Some(name) = name {
        name
    } else {
        warn!("could not determine host name, using 'unknown'");
        "unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_creates_output_directory_and_finishes() {
        let root = std::env::temp_dir().join("linux_cmd_session_test");
        let session = RecordingSession::new(&root);
        assert!(session.is_ok(), "RecordingSession::new() should succeed");

        let session = session.unwrap();
        let dir = session.output_dir().to_path_buf();
        assert!(dir.exists(), "Output directory should exist after new()");

        let result = session.finish();
        assert!(result.is_ok(), "finish() should succeed");
        assert!(dir.join("shell.cassette.yaml").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn finish_fails_while_adapter_holds_recorder() {
        let root = std::env::temp_dir().join("linux_cmd_session_held_test");
        let session = RecordingSession::new(&root).unwrap();
        let _held = Arc::clone(&session.shell);

        assert!(session.finish().is_err());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn host_name_returns_string() {
        assert!(!host_name().is_empty());
    }
}
