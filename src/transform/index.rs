//! Target file/directory index, computed once per run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::paths;

/// Read-only view of the files and directories a directive may resolve to.
///
/// `files` keeps the caller's order because the first file-name match wins.
/// `dirs` is in discovery order and never includes the project root or
/// anything above it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetIndex {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl TargetIndex {
    /// Builds the index from target files discovered under `root`.
    pub fn new<I, P>(root: &Path, target_files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let files: Vec<PathBuf> =
            target_files.into_iter().map(|f| paths::normalize(f.as_ref())).collect();
        let dirs = target_folders(root, &files);
        Self { files, dirs }
    }

    /// Target files in caller order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Every ancestor directory of every target file.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Collects the distinct ancestor directories of `files`, in discovery order.
///
/// Walking upward stops at the root sentinel: `root` itself, an empty
/// parent, or no parent at all. It also stops as soon as a directory is
/// already known, since its ancestors were recorded with it.
#[must_use]
pub fn target_folders(root: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
    let root = paths::normalize(root);
    let mut seen: HashSet<&Path> = HashSet::new();
    let mut folders = Vec::new();

    for file in files {
        let mut dir = file.parent();
        while let Some(current) = dir {
            if current.as_os_str().is_empty()
                || current == root.as_path()
                || !seen.insert(current)
            {
                break;
            }
            folders.push(current.to_path_buf());
            dir = current.parent();
        }
    }
    folders
}
