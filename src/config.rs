//! `tstransform.yaml` configuration and target file discovery.
//!
//! Every field is optional; a missing config file means all defaults:
//!
//! ```yaml
//! include: ["**/*.ts"]
//! exclude: ["node_modules/**"]
//! index_file: index.ts
//! source_extension: .ts
//! declaration_extension: .d.ts
//! members: declarations   # declarations | modules | sources
//! line_ending: native     # native | lf | crlf
//! ```

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Result, TransformError};
use crate::ports::FileSystem;

/// Default config file name, looked up under the project root.
pub const CONFIG_FILE_NAME: &str = "tstransform.yaml";

/// Which directory members a directory match expands to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberFilter {
    /// Plain source files and declaration files.
    Modules,
    /// Plain source files only.
    Sources,
    /// Anything with an extension except plain source files.
    #[default]
    Declarations,
}

/// Line terminator used when reassembling rewritten files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// `\r\n` on Windows, `\n` elsewhere.
    #[default]
    Native,
    /// Always `\n`.
    Lf,
    /// Always `\r\n`.
    Crlf,
}

impl LineEnding {
    /// The terminator string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native if cfg!(windows) => "\r\n",
            Self::Native | Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Globs (relative to the root) selecting target files.
    pub include: Vec<String>,
    /// Globs removing files from the include set.
    pub exclude: Vec<String>,
    /// File that a directory import collapses to.
    pub index_file: String,
    /// Extension of plain source files.
    pub source_extension: String,
    /// Extension of declaration-only files.
    pub declaration_extension: String,
    /// Directory expansion predicate.
    pub members: MemberFilter,
    /// Line terminator for rewritten files.
    pub line_ending: LineEnding,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.ts".to_string()],
            exclude: vec!["node_modules/**".to_string()],
            index_file: "index.ts".to_string(),
            source_extension: ".ts".to_string(),
            declaration_extension: ".d.ts".to_string(),
            members: MemberFilter::default(),
            line_ending: LineEnding::default(),
        }
    }
}

impl TransformConfig {
    /// Loads the config at `path` through the filesystem port.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Config`] if the file exists but cannot be
    /// read, is not valid YAML, or fails validation.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if !fs.exists(path) {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs.read_to_string(path).map_err(|e| TransformError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_yaml(&contents).map_err(|message| TransformError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a YAML document.
    ///
    /// # Errors
    ///
    /// Returns a message if the YAML is malformed or a field is invalid.
    pub fn from_yaml(contents: &str) -> std::result::Result<Self, String> {
        // An empty document deserializes as null, not as an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !self.source_extension.starts_with('.') || self.source_extension.len() < 2 {
            return Err(format!(
                "source_extension must look like \".ts\", got {:?}",
                self.source_extension
            ));
        }
        if !self.declaration_extension.ends_with(&self.source_extension)
            || self.declaration_extension == self.source_extension
        {
            return Err(format!(
                "declaration_extension {:?} must be a longer suffix ending in {:?}",
                self.declaration_extension, self.source_extension
            ));
        }
        if self.index_file.is_empty() || self.index_file.contains(['/', '\\']) {
            return Err(format!("index_file must be a bare file name, got {:?}", self.index_file));
        }
        Ok(())
    }

    /// Walks `root` and returns every file matching the include/exclude globs.
    ///
    /// Paths are returned relative to `root` (joined onto it unless it is
    /// `.`), sorted for a stable target order.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Discovery`] for invalid glob patterns.
    pub fn discover_targets(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let include_set = build_globset(&self.include)?;
        let exclude_set = build_globset(&self.exclude)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            if !include_set.is_match(rel) || exclude_set.is_match(rel) {
                continue;
            }
            if root == Path::new(".") {
                files.push(rel.to_path_buf());
            } else {
                files.push(root.join(rel));
            }
        }

        files.sort();
        files.dedup();
        log::debug!("discovered {} target files under {}", files.len(), root.display());
        Ok(files)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            continue;
        }
        let glob = Glob::new(trimmed).map_err(|err| {
            TransformError::Discovery(format!("invalid glob pattern '{pattern}': {err}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|err| TransformError::Discovery(format!("failed to build glob matcher: {err}")))
}
