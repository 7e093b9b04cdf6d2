//! Fatal errors that abort a transform run.
//!
//! Bad directives never end up here: they are rendered in-band as generated
//! comment lines. Only collaborator failures (I/O, configuration) are fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the transform pipeline.
pub type Result<T> = std::result::Result<T, TransformError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unrecoverable failure while running the engine.
#[derive(Error, Debug)]
pub enum TransformError {
    /// A changed file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying port error.
        source: BoxError,
    },

    /// A rewritten file could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying port error.
        source: BoxError,
    },

    /// A matched directory could not be listed during expansion.
    #[error("failed to list directory {}: {source}", path.display())]
    ListDir {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying port error.
        source: BoxError,
    },

    /// The configuration file could not be loaded or is invalid.
    #[error("invalid configuration {}: {message}", path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Target file discovery failed.
    #[error("failed to discover target files: {0}")]
    Discovery(String),
}

impl TransformError {
    /// Path of the file or directory involved, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::ListDir { path, .. }
            | Self::Config { path, .. } => Some(path),
            Self::Discovery(_) => None,
        }
    }
}
