//! In-memory filesystem for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::ports::filesystem::FileSystem;

/// Files live in a map; directories exist implicitly as prefixes of file paths.
pub struct MemFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    writes: Mutex<Vec<PathBuf>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self { files: Mutex::new(BTreeMap::new()), writes: Mutex::new(Vec::new()) }
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let fs = Self::new();
        {
            let mut map = fs.files.lock().unwrap();
            for (path, contents) in files {
                map.insert(PathBuf::from(path), (*contents).to_string());
            }
        }
        fs
    }

    /// Current contents of a file, panicking if it is missing.
    pub fn contents(&self, path: &str) -> String {
        self.files.lock().unwrap().get(Path::new(path)).cloned().expect("file should exist")
    }

    /// Paths passed to `write`, in call order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap().clone()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        self.writes.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let files = self.files.lock().unwrap();
        let names: BTreeSet<String> = files
            .keys()
            .filter_map(|k| k.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| first.as_os_str().to_string_lossy().into_owned())
            .collect();
        if names.is_empty() {
            return Err(format!("Not a directory: {}", path.display()).into());
        }
        Ok(names.into_iter().collect())
    }
}
