//! Cassette data structures for recording and replaying port interactions.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (currently always `"fs"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit hash at recording time.
    pub commit: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a YAML cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid cassette.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Returns the interactions recorded for a port, in sequence order.
    pub fn interactions_for<'a>(&'a self, port: &'a str) -> impl Iterator<Item = &'a Interaction> {
        self.interactions.iter().filter(move |i| i.port == port)
    }

    /// Returns the paths passed to recorded `fs::write` calls, in order.
    #[must_use]
    pub fn written_paths(&self) -> Vec<String> {
        self.interactions_for("fs")
            .filter(|i| i.method == "write")
            .filter_map(|i| i.input.get("path").and_then(|p| p.as_str()).map(String::from))
            .collect()
    }
}
