//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use serde_json::json;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
///
/// Every call is checked against the recorded input, so a replay also
/// verifies that the caller asked for the same paths (and wrote the same
/// contents) as when the cassette was recorded.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    /// Number of recorded interactions that have not been replayed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer.lock().expect("replayer lock poisoned").remaining()
    }

    fn next_output(&self, method: &str, input: &serde_json::Value) -> serde_json::Value {
        let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
        replayer.next_interaction("fs", method, input).output.clone()
    }
}

/// Extracts a Result from a cassette output using the `Ok`/`Err` convention.
fn next_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("Err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("Ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

fn path_input(path: &Path) -> serde_json::Value {
    json!({ "path": path.display().to_string() })
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = self.next_output("read_to_string", &path_input(path));
        next_result(&output, "fs::read_to_string")
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let input = json!({ "path": path.display().to_string(), "contents": contents });
        let output = self.next_output("write", &input);
        if let Some(err) = output.get("Err") {
            let msg = err.as_str().unwrap_or("unknown error").to_string();
            return Err(msg.into());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let output = self.next_output("exists", &path_input(path));
        output.as_bool().expect("fs::exists: expected boolean output")
    }

    fn is_dir(&self, path: &Path) -> bool {
        let output = self.next_output("is_dir", &path_input(path));
        output.as_bool().expect("fs::is_dir: expected boolean output")
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let output = self.next_output("list_dir", &path_input(path));
        next_result(&output, "fs::list_dir")
    }
}
