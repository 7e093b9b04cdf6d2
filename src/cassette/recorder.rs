//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Records interactions and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Record an interaction. The `seq` field is assigned automatically.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.next_seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
        self.next_seq += 1;
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cassettes/run.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "run", "deadbeef");
        assert!(recorder.is_empty());
        recorder.record("fs", "exists", json!({"path": "lib/index.ts"}), json!(true));
        recorder.record("fs", "list_dir", json!({"path": "lib"}), json!({"Ok": ["a.ts"]}));
        recorder.record("fs", "write", json!({"path": "app.ts"}), json!({"Ok": null}));
        assert_eq!(recorder.len(), 3);

        let result_path = recorder.finish().expect("finish should succeed");
        assert_eq!(result_path, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "run");
        assert_eq!(cassette.commit, "deadbeef");
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(cassette.interactions[1].method, "list_dir");
    }
}
