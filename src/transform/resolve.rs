//! Resolves a bare directive name to concrete target files.

use std::path::{Path, PathBuf};

use super::index::TargetIndex;
use super::paths;
use crate::config::{MemberFilter, TransformConfig};
use crate::error::{Result, TransformError};
use crate::ports::FileSystem;

/// Extension and naming rules shared by resolution and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// File a directory collapses to under the index shortcut.
    pub index_file: String,
    /// Extension of plain source files (`.ts`).
    pub source_extension: String,
    /// Extension of declaration-only files (`.d.ts`).
    pub declaration_extension: String,
    /// Which directory members survive expansion.
    pub members: MemberFilter,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::from(&TransformConfig::default())
    }
}

impl From<&TransformConfig> for ResolveOptions {
    fn from(config: &TransformConfig) -> Self {
        Self {
            index_file: config.index_file.clone(),
            source_extension: config.source_extension.clone(),
            declaration_extension: config.declaration_extension.clone(),
            members: config.members,
        }
    }
}

impl ResolveOptions {
    /// Strips a trailing declaration extension, or else a trailing source
    /// extension, from `name`.
    #[must_use]
    pub fn strip_module_extension<'a>(&self, name: &'a str) -> &'a str {
        name.strip_suffix(self.declaration_extension.as_str())
            .or_else(|| name.strip_suffix(self.source_extension.as_str()))
            .unwrap_or(name)
    }

    /// `index` for `index.ts`.
    #[must_use]
    pub fn index_stem(&self) -> &str {
        self.strip_module_extension(&self.index_file)
    }

    /// Applies the configured member predicate to a directory entry name.
    #[must_use]
    pub fn accepts_member(&self, file_name: &str) -> bool {
        let declaration = file_name.ends_with(self.declaration_extension.as_str());
        let source = !declaration && file_name.ends_with(self.source_extension.as_str());
        match self.members {
            MemberFilter::Modules => source || declaration,
            MemberFilter::Sources => source,
            MemberFilter::Declarations => !source,
        }
    }

    /// Binding name for a resolved file: the alias if given, else the file
    /// stem. An `index` name is replaced by the parent directory's name.
    #[must_use]
    pub fn binding_name(&self, resolved: &Path, alias: Option<&str>) -> String {
        let name = alias.unwrap_or_else(|| self.strip_module_extension(paths::base_name(resolved)));
        if name.eq_ignore_ascii_case(self.index_stem()) {
            paths::base_name(paths::parent_dir(resolved)).to_string()
        } else {
            name.to_string()
        }
    }

    fn file_matches(&self, file: &Path, name: &str) -> bool {
        let base = paths::base_name(file);
        base == name
            || base.strip_suffix(self.declaration_extension.as_str()) == Some(name)
            || base.strip_suffix(self.source_extension.as_str()) == Some(name)
    }
}

/// Name resolution against a fixed target index.
///
/// Borrowed, read-only state only: one resolver is shared by every file of
/// a run.
pub struct NameResolver<'a> {
    fs: &'a dyn FileSystem,
    index: &'a TargetIndex,
    options: &'a ResolveOptions,
}

impl<'a> NameResolver<'a> {
    /// Creates a resolver over `index`, probing the disk through `fs`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, index: &'a TargetIndex, options: &'a ResolveOptions) -> Self {
        Self { fs, index, options }
    }

    /// The naming rules in effect.
    #[must_use]
    pub fn options(&self) -> &ResolveOptions {
        self.options
    }

    /// Resolves `name` as seen from `current_file`.
    ///
    /// The first target file whose name matches comes first, followed by
    /// the expansion of the first matching target directory. An empty list
    /// means nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ListDir`] if a matched directory cannot be
    /// listed.
    pub fn resolve(
        &self,
        current_file: &Path,
        name: &str,
        use_index_shortcut: bool,
    ) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        if let Some(file) = self.index.files().iter().find(|f| self.options.file_matches(f, name)) {
            files.push(file.clone());
        }

        if let Some(dir) = self.index.dirs().iter().find(|d| paths::base_name(d) == name) {
            let index_file = dir.join(&self.options.index_file);
            if use_index_shortcut
                && self.fs.exists(&index_file)
                && !paths::same_file(current_file, &index_file)
            {
                files.push(index_file);
            } else {
                files.extend(self.expand_dir(current_file, dir)?);
            }
        }

        log::trace!("resolved {name:?} from {}: {files:?}", current_file.display());
        Ok(files)
    }

    /// Direct members of `dir` that survive the member predicate, sorted.
    fn expand_dir(&self, current_file: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = self
            .fs
            .list_dir(dir)
            .map_err(|source| TransformError::ListDir { path: dir.to_path_buf(), source })?;

        let mut members: Vec<PathBuf> = entries
            .iter()
            .map(|entry| dir.join(entry))
            .filter(|candidate| !paths::same_file(current_file, candidate))
            .filter(|candidate| candidate.extension().is_some())
            .filter(|candidate| self.options.accepts_member(paths::base_name(candidate)))
            .filter(|candidate| !self.fs.is_dir(candidate))
            .collect();
        members.sort();
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemFs;

    fn paths_of(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    fn modules() -> ResolveOptions {
        ResolveOptions { members: MemberFilter::Modules, ..Default::default() }
    }

    fn fixture(files: &[&str]) -> (MemFs, TargetIndex) {
        let entries: Vec<(&str, &str)> = files.iter().map(|f| (*f, "")).collect();
        (MemFs::with_files(&entries), TargetIndex::new(Path::new("."), files))
    }

    #[test]
    fn index_shortcut_collapses_directory() {
        let (fs, index) = fixture(&["a/b.ts", "a/c.ts", "a/index.ts"]);
        let options = ResolveOptions::default();
        let resolver = NameResolver::new(&fs, &index, &options);

        let resolved = resolver.resolve(Path::new("x.ts"), "a", true).unwrap();
        assert_eq!(resolved, paths_of(&["a/index.ts"]));
    }

    #[test]
    fn index_file_itself_gets_full_expansion() {
        let (fs, index) = fixture(&["a/b.ts", "a/c.ts", "a/index.ts"]);
        let options = modules();
        let resolver = NameResolver::new(&fs, &index, &options);

        let resolved = resolver.resolve(Path::new("a/index.ts"), "a", true).unwrap();
        assert_eq!(resolved, paths_of(&["a/b.ts", "a/c.ts"]));
    }

    #[test]
    fn without_shortcut_every_member_is_listed() {
        let (fs, index) = fixture(&["a/c.ts", "a/index.ts", "a/b.ts"]);
        let options = modules();
        let resolver = NameResolver::new(&fs, &index, &options);

        let resolved = resolver.resolve(Path::new("x.ts"), "a", false).unwrap();
        assert_eq!(resolved, paths_of(&["a/b.ts", "a/c.ts", "a/index.ts"]));
    }

    #[test]
    fn file_match_precedes_directory_members() {
        let (fs, index) = fixture(&["lib/util.ts", "util/one.ts", "util/two.ts"]);
        let options = modules();
        let resolver = NameResolver::new(&fs, &index, &options);

        let resolved = resolver.resolve(Path::new("app.ts"), "util", false).unwrap();
        assert_eq!(resolved, paths_of(&["lib/util.ts", "util/one.ts", "util/two.ts"]));
    }

    #[test]
    fn first_file_match_wins() {
        let (fs, index) = fixture(&["b/util.ts", "a/util.ts"]);
        let options = ResolveOptions::default();
        let resolver = NameResolver::new(&fs, &index, &options);

        let resolved = resolver.resolve(Path::new("app.ts"), "util", true).unwrap();
        assert_eq!(resolved, paths_of(&["b/util.ts"]));
    }

    #[test]
    fn declaration_and_full_names_match_files() {
        let (fs, index) = fixture(&["typings/node.d.ts", "data/config.json"]);
        let options = ResolveOptions::default();
        let resolver = NameResolver::new(&fs, &index, &options);

        assert_eq!(
            resolver.resolve(Path::new("app.ts"), "node", false).unwrap(),
            paths_of(&["typings/node.d.ts"])
        );
        assert_eq!(
            resolver.resolve(Path::new("app.ts"), "config.json", false).unwrap(),
            paths_of(&["data/config.json"])
        );
    }

    #[test]
    fn current_file_is_never_a_member() {
        let (fs, index) = fixture(&["a/b.ts", "a/self.ts"]);
        let options = modules();
        let resolver = NameResolver::new(&fs, &index, &options);

        let resolved = resolver.resolve(Path::new("./a/self.ts"), "a", false).unwrap();
        assert_eq!(resolved, paths_of(&["a/b.ts"]));
    }

    #[test]
    fn expansion_skips_subdirectories_and_extensionless_entries() {
        let fs = MemFs::with_files(&[
            ("a/b.ts", ""),
            ("a/LICENSE", ""),
            ("a/nested.ts/inner.ts", ""),
        ]);
        let index = TargetIndex::new(Path::new("."), ["a/b.ts"]);
        let options = modules();
        let resolver = NameResolver::new(&fs, &index, &options);

        let resolved = resolver.resolve(Path::new("x.ts"), "a", false).unwrap();
        assert_eq!(resolved, paths_of(&["a/b.ts"]));
    }

    #[test]
    fn member_filters_select_sources_or_declarations() {
        let fs = MemFs::with_files(&[("t/a.ts", ""), ("t/b.d.ts", ""), ("t/c.js", "")]);
        let index = TargetIndex::new(Path::new("."), ["t/a.ts"]);

        let sources = ResolveOptions { members: MemberFilter::Sources, ..Default::default() };
        let resolver = NameResolver::new(&fs, &index, &sources);
        assert_eq!(resolver.resolve(Path::new("x.ts"), "t", false).unwrap(), paths_of(&["t/a.ts"]));

        let declarations =
            ResolveOptions { members: MemberFilter::Declarations, ..Default::default() };
        let resolver = NameResolver::new(&fs, &index, &declarations);
        assert_eq!(
            resolver.resolve(Path::new("x.ts"), "t", false).unwrap(),
            paths_of(&["t/b.d.ts", "t/c.js"])
        );

        let module_options = modules();
        let resolver = NameResolver::new(&fs, &index, &module_options);
        assert_eq!(
            resolver.resolve(Path::new("x.ts"), "t", false).unwrap(),
            paths_of(&["t/a.ts", "t/b.d.ts"])
        );
    }

    #[test]
    fn default_members_exclude_plain_sources() {
        let fs = MemFs::with_files(&[
            ("a/b.ts", ""),
            ("a/c.ts", ""),
            ("a/legacy.js", ""),
            ("a/types.d.ts", ""),
        ]);
        let index = TargetIndex::new(Path::new("."), ["a/b.ts", "a/c.ts"]);
        let options = ResolveOptions::default();
        let resolver = NameResolver::new(&fs, &index, &options);

        assert_eq!(
            resolver.resolve(Path::new("x.ts"), "a", false).unwrap(),
            paths_of(&["a/legacy.js", "a/types.d.ts"])
        );
    }

    #[test]
    fn unknown_name_resolves_to_nothing() {
        let (fs, index) = fixture(&["a/b.ts"]);
        let options = ResolveOptions::default();
        let resolver = NameResolver::new(&fs, &index, &options);

        assert!(resolver.resolve(Path::new("x.ts"), "doesNotExist", true).unwrap().is_empty());
    }

    #[test]
    fn unlistable_directory_is_fatal() {
        let fs = MemFs::new();
        let index = TargetIndex::new(Path::new("."), ["gone/a.ts"]);
        let options = ResolveOptions::default();
        let resolver = NameResolver::new(&fs, &index, &options);

        let err = resolver.resolve(Path::new("x.ts"), "gone", false).unwrap_err();
        assert!(matches!(err, TransformError::ListDir { .. }));
    }

    #[test]
    fn binding_names_strip_extensions_and_rename_index() {
        let options = ResolveOptions::default();
        assert_eq!(options.binding_name(Path::new("a/b.ts"), None), "b");
        assert_eq!(options.binding_name(Path::new("t/node.d.ts"), None), "node");
        assert_eq!(options.binding_name(Path::new("lib/index.ts"), None), "lib");
        assert_eq!(options.binding_name(Path::new("lib/Index.ts"), None), "lib");
        assert_eq!(options.binding_name(Path::new("a/b.ts"), Some("bee")), "bee");
    }
}
