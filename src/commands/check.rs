//! `tstransform check` command.

use std::path::PathBuf;

use super::Project;
use crate::context::ServiceContext;
use crate::transform::{Mode, TransformEngine};

/// Regenerate `files` in memory and fail if any would change.
///
/// # Errors
///
/// Returns an error string listing the stale files, or describing the
/// first I/O failure.
pub fn run_with_context(
    ctx: &ServiceContext,
    project: &Project,
    files: &[PathBuf],
) -> Result<(), String> {
    let engine = TransformEngine::new(ctx, &project.config, &project.root, &project.targets);
    let report = engine.run(files, Mode::Check).map_err(|e| e.to_string())?;

    let stale: Vec<String> = report.changed().map(|p| p.display().to_string()).collect();
    if stale.is_empty() {
        println!("{} files up to date", report.outcomes.len());
        return Ok(());
    }
    Err(format!("generated output is stale in {} files:\n  {}", stale.len(), stale.join("\n  ")))
}
