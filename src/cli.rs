//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `tstransform`.
#[derive(Debug, Parser)]
#[command(
    name = "tstransform",
    version,
    about = "Regenerate the code behind ///ts: directives in TypeScript sources"
)]
pub struct Cli {
    /// Configuration file (defaults to `tstransform.yaml` under the root).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project root that target files are discovered under.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Log per-file outcomes.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Regenerate directive output and write the files that changed.
    Run {
        /// Changed files to process; all target files when omitted.
        files: Vec<PathBuf>,
    },
    /// Report files whose generated output is stale, failing if any are.
    Check {
        /// Files to check; all target files when omitted.
        files: Vec<PathBuf>,
    },
    /// Remove every generated line, keeping directive anchors.
    Clean {
        /// Files to clean; all target files when omitted.
        files: Vec<PathBuf>,
    },
}

impl Command {
    /// The explicit file list given to the command.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Self::Run { files } | Self::Check { files } | Self::Clean { files } => files,
        }
    }
}

impl Cli {
    /// Path of the configuration file to load.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.root.join(crate::config::CONFIG_FILE_NAME))
    }
}
