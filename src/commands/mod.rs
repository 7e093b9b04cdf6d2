//! Command dispatch and handlers.

pub mod check;
pub mod clean;
pub mod run;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::TransformConfig;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `TSTRANSFORM_RECORD` is set to a file path, all filesystem
/// interactions are recorded to a cassette at that path.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let session = match env::var("TSTRANSFORM_RECORD") {
        Ok(path) => Some(RecordingSession::new(PathBuf::from(path))?),
        Err(_) => None,
    };
    let ctx = match &session {
        Some(session) => ServiceContext::recording(session),
        None => ServiceContext::live(),
    };

    let result = dispatch_with_context(cli, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if configuration, discovery or the command fails.
pub fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<(), String> {
    let project = Project::load(ctx, &cli.config_path(), &cli.root)?;
    let files = project.changed_files(cli.command.files());
    match &cli.command {
        Command::Run { .. } => run::run_with_context(ctx, &project, &files),
        Command::Check { .. } => check::run_with_context(ctx, &project, &files),
        Command::Clean { .. } => clean::run_with_context(ctx, &project, &files),
    }
}

/// Configuration and discovered target files for one invocation.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory the targets were discovered under.
    pub root: PathBuf,
    /// Effective configuration.
    pub config: TransformConfig,
    /// Every target file under the root, sorted.
    pub targets: Vec<PathBuf>,
}

impl Project {
    /// Loads the config and discovers the target files under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the config is invalid or discovery fails.
    pub fn load(ctx: &ServiceContext, config_path: &Path, root: &Path) -> Result<Self, String> {
        let config = TransformConfig::load(ctx.fs.as_ref(), config_path).map_err(|e| e.to_string())?;
        let targets = config.discover_targets(root).map_err(|e| e.to_string())?;
        Ok(Self { root: root.to_path_buf(), config, targets })
    }

    /// The explicit files if any were given, otherwise every target.
    #[must_use]
    pub fn changed_files(&self, explicit: &[PathBuf]) -> Vec<PathBuf> {
        if explicit.is_empty() {
            self.targets.clone()
        } else {
            explicit.to_vec()
        }
    }
}

/// Finish a recording session and print the cassette path.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output = session.finish()?;
    eprintln!("Recording saved to: {}", output.display());
    Ok(())
}
