//! Runs the rewriter over a set of changed files.

use std::fmt;
use std::path::{Path, PathBuf};

use super::directive::DirectiveSet;
use super::index::TargetIndex;
use super::paths;
use super::resolve::{NameResolver, ResolveOptions};
use super::rewrite::{strip_bom, LineRewriter};
use crate::config::{LineEnding, TransformConfig};
use crate::context::ServiceContext;
use crate::error::{Result, TransformError};

/// What a run does with each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Regenerate and write files whose content changed.
    Write,
    /// Regenerate in memory only; report files that would change.
    Check,
    /// Remove generated lines and write files whose content changed.
    Clean,
}

/// Result of processing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// No directive marker; never compared or written.
    Skipped,
    /// Regenerated output equals the current content.
    Unchanged,
    /// New content was written.
    Rewritten,
    /// New content differs but was not written (check mode).
    Stale,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Skipped => "skipped",
            Self::Unchanged => "unchanged",
            Self::Rewritten => "rewritten",
            Self::Stale => "stale",
        };
        f.write_str(label)
    }
}

/// Per-file outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Normalized file path.
    pub path: PathBuf,
    /// What happened to it.
    pub status: FileStatus,
}

/// Outcomes of a whole run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per changed file.
    pub outcomes: Vec<FileOutcome>,
}

impl RunReport {
    /// Number of files with the given status.
    #[must_use]
    pub fn count(&self, status: FileStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Files that were rewritten or would be.
    pub fn changed(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Rewritten | FileStatus::Stale))
            .map(|o| o.path.as_path())
    }
}

/// Holds the per-run state: the target index is built once in [`new`] and
/// only read afterwards.
///
/// [`new`]: TransformEngine::new
pub struct TransformEngine<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
    cwd: PathBuf,
    index: TargetIndex,
    options: ResolveOptions,
    directives: DirectiveSet,
    line_ending: LineEnding,
}

impl<'a> TransformEngine<'a> {
    /// Prepares a run over `target_files`, discovered under `root`, with the
    /// given configuration.
    pub fn new<I, P>(
        ctx: &'a ServiceContext,
        config: &TransformConfig,
        root: &Path,
        target_files: I,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let index = TargetIndex::new(root, target_files);
        log::debug!(
            "indexed {} target files in {} directories",
            index.files().len(),
            index.dirs().len()
        );
        let cwd = std::env::current_dir().unwrap_or_else(|err| {
            log::warn!("cannot read working directory, changed files are used as given: {err}");
            PathBuf::new()
        });
        Self {
            ctx,
            root: root.to_path_buf(),
            cwd,
            index,
            options: ResolveOptions::from(config),
            directives: DirectiveSet::new(),
            line_ending: config.line_ending,
        }
    }

    /// The target index for this run.
    #[must_use]
    pub fn index(&self) -> &TargetIndex {
        &self.index
    }

    /// Processes each changed file in order.
    ///
    /// Changed files may be relative to the working directory or absolute;
    /// each is put on the same base as the target files first.
    ///
    /// # Errors
    ///
    /// Stops at the first read, write or directory listing failure and
    /// returns it with the offending path.
    pub fn run<I, P>(&self, changed_files: I, mode: Mode) -> Result<RunReport>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let resolver = NameResolver::new(self.ctx.fs.as_ref(), &self.index, &self.options);
        let rewriter = LineRewriter::new(&self.directives, &resolver, self.line_ending);

        let mut report = RunReport::default();
        for file in changed_files {
            let path = paths::rebase(file.as_ref(), &self.root, &self.cwd);
            let status = self.process_file(&rewriter, &path, mode)?;
            log::debug!("{}: {status}", path.display());
            report.outcomes.push(FileOutcome { path, status });
        }

        log::info!(
            "processed {} files: {} rewritten, {} stale, {} unchanged, {} skipped",
            report.outcomes.len(),
            report.count(FileStatus::Rewritten),
            report.count(FileStatus::Stale),
            report.count(FileStatus::Unchanged),
            report.count(FileStatus::Skipped),
        );
        Ok(report)
    }

    fn process_file(
        &self,
        rewriter: &LineRewriter<'_>,
        path: &Path,
        mode: Mode,
    ) -> Result<FileStatus> {
        let raw = self
            .ctx
            .fs
            .read_to_string(path)
            .map_err(|source| TransformError::Read { path: path.to_path_buf(), source })?;

        let regenerated = match mode {
            Mode::Write | Mode::Check => rewriter.rewrite(path, &raw)?,
            Mode::Clean => rewriter.strip_generated(&raw),
        };
        let Some(content) = regenerated else {
            return Ok(FileStatus::Skipped);
        };

        if content == strip_bom(&raw) {
            return Ok(FileStatus::Unchanged);
        }
        if mode == Mode::Check {
            return Ok(FileStatus::Stale);
        }

        self.ctx
            .fs
            .write(path, &content)
            .map_err(|source| TransformError::Write { path: path.to_path_buf(), source })?;
        Ok(FileStatus::Rewritten)
    }
}
