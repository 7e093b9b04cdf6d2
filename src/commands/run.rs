//! `tstransform run` command.

use std::path::PathBuf;

use super::Project;
use crate::context::ServiceContext;
use crate::transform::{Mode, TransformEngine};

/// Regenerate directive output in `files` and write those that changed.
///
/// # Errors
///
/// Returns an error string naming the file if a read, write or directory
/// listing fails.
pub fn run_with_context(
    ctx: &ServiceContext,
    project: &Project,
    files: &[PathBuf],
) -> Result<(), String> {
    let engine = TransformEngine::new(ctx, &project.config, &project.root, &project.targets);
    let report = engine.run(files, Mode::Write).map_err(|e| e.to_string())?;
    for path in report.changed() {
        println!("rewrote {}", path.display());
    }
    Ok(())
}
