//! The `///ts:` directive kinds and how each one renders its output.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::paths;
use super::resolve::NameResolver;
use crate::error::Result;

/// Matches any directive-shaped line, known key or not.
static SIGNATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"///\s*ts:").expect("signature pattern is valid"));

/// Returns `true` if `content` holds at least one `///ts:` directive marker.
#[must_use]
pub fn contains_signature(content: &str) -> bool {
    SIGNATURE.is_match(content)
}

/// The closed set of directive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `///ts:import=<name>[,<alias>]`
    Import,
    /// `///ts:export=<name>[,<alias>]`
    Export,
    /// `///ts:ref=<name>`
    Reference,
    /// Any other `///ts:` line.
    Unknown,
}

impl DirectiveKind {
    /// Dispatch priority. `Unknown` matches every directive and must stay last.
    pub const PRIORITY: [Self; 4] = [Self::Import, Self::Export, Self::Reference, Self::Unknown];

    /// Key as written after `ts:`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Export => "export",
            Self::Reference => "ref",
            Self::Unknown => "unknown",
        }
    }

    fn argument_syntax(self) -> &'static str {
        match self {
            Self::Import | Self::Export => "<fileOrDirectoryName>[,<variableName>]",
            Self::Reference | Self::Unknown => "<fileOrDirectoryName>",
        }
    }

    /// Whether a directory with an index file collapses to that file.
    #[must_use]
    pub fn uses_index_shortcut(self) -> bool {
        matches!(self, Self::Import)
    }

    /// Whether the emitted path drops its `.ts` / `.d.ts` extension.
    #[must_use]
    pub fn strips_extension(self) -> bool {
        matches!(self, Self::Import | Self::Export)
    }
}

/// A directive kind together with its compiled pattern and markers.
#[derive(Debug, Clone)]
pub struct DirectiveSpec {
    kind: DirectiveKind,
    pattern: Regex,
    signature: String,
    signature_generated: String,
}

impl DirectiveSpec {
    /// Compiles the pattern and markers for `kind`.
    #[must_use]
    pub fn new(kind: DirectiveKind) -> Self {
        let pattern = match kind {
            DirectiveKind::Unknown => r"^///\s*ts:()(.*)".to_string(),
            _ => format!(r"^///\s*ts:{}(=?)(.*)", regex::escape(kind.key())),
        };
        let signature = format!("///ts:{}", kind.key());
        let signature_generated = format!("{signature}:generated");
        Self {
            kind,
            pattern: Regex::new(&pattern).expect("directive pattern is valid"),
            signature,
            signature_generated,
        }
    }

    /// The directive kind.
    #[must_use]
    pub fn kind(&self) -> DirectiveKind {
        self.kind
    }

    /// Bare marker, e.g. `///ts:import`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Marker appended to every emitted line, e.g. `///ts:import:generated`.
    #[must_use]
    pub fn signature_generated(&self) -> &str {
        &self.signature_generated
    }

    /// Returns `true` if this spec produced `line` on an earlier pass.
    #[must_use]
    pub fn is_generated(&self, line: &str) -> bool {
        line.contains(&self.signature_generated)
    }

    /// Matches a directive line, returning its trimmed arguments.
    ///
    /// The outer `None` means the line is not this directive. The inner
    /// `None` means it is, but the `=<args>` part is missing or blank.
    #[must_use]
    pub fn matches<'l>(&self, line: &'l str) -> Option<Option<&'l str>> {
        let captures = self.pattern.captures(line)?;
        let has_equals = captures.get(1).is_some_and(|m| !m.as_str().is_empty());
        let args = captures
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|args| has_equals && !args.is_empty());
        Some(args)
    }

    /// Produces the generated lines for one directive occurrence.
    ///
    /// Syntax errors, unknown keys and unmatched names are rendered as a
    /// single generated comment line; only I/O failures are returned as
    /// errors.
    ///
    /// # Errors
    ///
    /// Propagates directory listing failures from the resolver.
    pub fn transform(
        &self,
        source_file: &Path,
        args: Option<&str>,
        resolver: &NameResolver<'_>,
    ) -> Result<Vec<String>> {
        if self.kind == DirectiveKind::Unknown {
            return Ok(vec![format!("/// Unknown transform {}", self.signature_generated)]);
        }
        let Some(args) = args else {
            return Ok(vec![self.syntax_error()]);
        };

        let mut vars = args.split(',');
        let requested = vars.next().unwrap_or_default().trim();
        let alias = vars.next().map(str::trim).filter(|alias| !alias.is_empty());

        let resolved = resolver.resolve(source_file, requested, self.kind.uses_index_shortcut())?;
        if resolved.is_empty() {
            return Ok(vec![format!(
                "/// No file or directory matched name \"{requested}\" {}",
                self.signature_generated
            )]);
        }

        let options = resolver.options();
        let source_dir = paths::parent_dir(source_file);
        let mut lines = Vec::with_capacity(resolved.len());
        for target in &resolved {
            let filename = options.binding_name(target, alias);
            let lossy = target.to_string_lossy();
            let target_str: &str = &lossy;
            let target_path = if self.kind.strips_extension() {
                options.strip_module_extension(target_str)
            } else {
                target_str
            };
            let path_to_file = paths::make_relative(source_dir, Path::new(target_path), true);
            lines.extend(self.render(&filename, &path_to_file));
        }
        Ok(lines)
    }

    fn render(&self, filename: &str, path_to_file: &str) -> Vec<String> {
        let marker = &self.signature_generated;
        match self.kind {
            DirectiveKind::Import => {
                vec![format!("import {filename} = require('{path_to_file}'); {marker}")]
            }
            DirectiveKind::Export => vec![
                format!("import {filename}_file = require('{path_to_file}'); {marker}"),
                format!("export var {filename} = {filename}_file; {marker}"),
            ],
            DirectiveKind::Reference => {
                vec![format!("/// <reference path=\"{path_to_file}\"/> {marker}")]
            }
            DirectiveKind::Unknown => Vec::new(),
        }
    }

    fn syntax_error(&self) -> String {
        format!(
            "/// Invalid syntax for ts:{}={} {}",
            self.kind.key(),
            self.kind.argument_syntax(),
            self.signature_generated
        )
    }
}

/// All directive specs in dispatch order.
#[derive(Debug, Clone)]
pub struct DirectiveSet {
    specs: Vec<DirectiveSpec>,
}

impl Default for DirectiveSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveSet {
    /// Builds one spec per kind, in [`DirectiveKind::PRIORITY`] order.
    #[must_use]
    pub fn new() -> Self {
        Self { specs: DirectiveKind::PRIORITY.into_iter().map(DirectiveSpec::new).collect() }
    }

    /// Specs in dispatch order.
    #[must_use]
    pub fn specs(&self) -> &[DirectiveSpec] {
        &self.specs
    }

    /// Returns `true` if any spec generated `line`.
    #[must_use]
    pub fn is_generated(&self, line: &str) -> bool {
        self.specs.iter().any(|spec| spec.is_generated(line))
    }

    /// First spec matching `line`, with the directive arguments.
    #[must_use]
    pub fn find<'l>(&self, line: &'l str) -> Option<(&DirectiveSpec, Option<&'l str>)> {
        self.specs.iter().find_map(|spec| spec.matches(line).map(|args| (spec, args)))
    }
}
