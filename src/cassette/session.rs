//! Recording session owning the filesystem cassette recorder.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Owns the recorder shared with the recording filesystem adapter.
///
/// The adapter holds a clone of the `Arc`; it must be dropped before
/// [`RecordingSession::finish`] can take the recorder back.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    output: PathBuf,
}

impl RecordingSession {
    /// Create a session that will write its cassette to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette already exists at `output`.
    pub fn new(output: impl Into<PathBuf>) -> Result<Self, String> {
        let output = output.into();
        if output.exists() {
            return Err(format!("Cassette file already exists: {}", output.display()));
        }

        let name = format!("tstransform-{}", Utc::now().format("%Y-%m-%dT%H-%M-%S"));
        let recorder = CassetteRecorder::new(&output, name, get_commit_hash());
        Ok(Self { fs: Arc::new(Mutex::new(recorder)), output })
    }

    /// Path the cassette will be written to.
    #[must_use]
    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    /// Finish the recorder and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter still holds the recorder or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.fs)
            .map_err(|_| "Recording adapter for fs still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for fs poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write fs cassette: {e}"))
    }
}

/// Get the current git commit hash, or "unknown" with a warning if unavailable.
fn get_commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    hash.unwrap_or_else(|| {
        log::warn!("could not get git commit hash, using 'unknown'");
        "unknown".to_string()
    })
}
