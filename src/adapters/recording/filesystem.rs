//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::FileSystem;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: &'a str,
    contents: &'a str,
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.read_to_string(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "fs", "read_to_string", &input, &result);
        result
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path: &path.display().to_string(), contents };
        record_result(&self.recorder, "fs", "write", &input, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        let input = PathInput { path: &path.display().to_string() };
        record_interaction(&self.recorder, "fs", "exists", &input, &result);
        result
    }

    fn is_dir(&self, path: &Path) -> bool {
        let result = self.inner.is_dir(path);
        let input = PathInput { path: &path.display().to_string() };
        record_interaction(&self.recorder, "fs", "is_dir", &input, &result);
        result
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.list_dir(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "fs", "list_dir", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::cassette::format::Cassette;

    #[test]
    fn records_reads_and_failed_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("app.ts");
        std::fs::write(&source, "///ts:import=util\n").unwrap();
        let cassette_path = dir.path().join("fs.cassette.yaml");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test", "abc")));

        // Scope the adapter so it's dropped before we try to unwrap
        {
            let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder));
            assert!(fs.read_to_string(&source).is_ok());
            assert!(!fs.exists(&dir.path().join("lib/index.ts")));
            assert!(fs.list_dir(&dir.path().join("missing")).is_err());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = Cassette::load(&cassette_path).unwrap();
        let methods: Vec<&str> = cassette.interactions.iter().map(|i| i.method.as_str()).collect();
        assert_eq!(methods, vec!["read_to_string", "exists", "list_dir"]);
        assert_eq!(cassette.interactions[0].output["Ok"], "///ts:import=util\n");
        assert_eq!(cassette.interactions[1].output, serde_json::json!(false));
        assert!(cassette.interactions[2].output.get("Err").is_some());
    }
}
