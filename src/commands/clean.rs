//! `tstransform clean` command.

use std::path::PathBuf;

use super::Project;
use crate::context::ServiceContext;
use crate::transform::{Mode, TransformEngine};

/// Strip generated lines from `files`, keeping directive anchors.
///
/// # Errors
///
/// Returns an error string naming the file if a read or write fails.
pub fn run_with_context(
    ctx: &ServiceContext,
    project: &Project,
    files: &[PathBuf],
) -> Result<(), String> {
    let engine = TransformEngine::new(ctx, &project.config, &project.root, &project.targets);
    let report = engine.run(files, Mode::Clean).map_err(|e| e.to_string())?;
    for path in report.changed() {
        println!("cleaned {}", path.display());
    }
    Ok(())
}
