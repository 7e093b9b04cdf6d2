//! Per-file regeneration: drop stale output, re-expand every directive.

use std::path::Path;

use super::directive::{contains_signature, DirectiveSet, DirectiveSpec};
use super::resolve::NameResolver;
use crate::config::LineEnding;
use crate::error::Result;

/// How a single input line is treated.
#[derive(Debug)]
pub enum LineKind<'s, 'l> {
    /// Output of an earlier pass; always dropped.
    Generated,
    /// An anchor directive; kept and followed by fresh output.
    Directive {
        /// First spec (in priority order) matching the line.
        spec: &'s DirectiveSpec,
        /// Trimmed `=<args>` part, if present and non-blank.
        args: Option<&'l str>,
    },
    /// Author-owned content; kept verbatim.
    Plain,
}

/// Strips a leading UTF-8 byte-order mark.
#[must_use]
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Splits on `\r\n`, `\r` or `\n`. A trailing terminator yields a final
/// empty line, so joining the result restores the terminator.
#[must_use]
pub fn split_lines(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&content[start..]);
    lines
}

/// Rewrites file contents against a shared resolver.
pub struct LineRewriter<'a> {
    directives: &'a DirectiveSet,
    resolver: &'a NameResolver<'a>,
    line_ending: LineEnding,
}

impl<'a> LineRewriter<'a> {
    /// Creates a rewriter joining output lines with `line_ending`.
    #[must_use]
    pub fn new(
        directives: &'a DirectiveSet,
        resolver: &'a NameResolver<'a>,
        line_ending: LineEnding,
    ) -> Self {
        Self { directives, resolver, line_ending }
    }

    /// Classifies one line. Generated markers win over directive patterns.
    #[must_use]
    pub fn classify<'l>(&self, line: &'l str) -> LineKind<'a, 'l> {
        if self.directives.is_generated(line) {
            return LineKind::Generated;
        }
        match self.directives.find(line) {
            Some((spec, args)) => LineKind::Directive { spec, args },
            None => LineKind::Plain,
        }
    }

    /// Regenerates every directive block in `content`.
    ///
    /// Returns `None` when the content has no directive marker at all, so
    /// callers can skip the file without comparing.
    ///
    /// # Errors
    ///
    /// Propagates directory listing failures from resolution.
    pub fn rewrite(&self, file: &Path, content: &str) -> Result<Option<String>> {
        let content = strip_bom(content);
        if !contains_signature(content) {
            return Ok(None);
        }

        let mut output: Vec<String> = Vec::new();
        for line in split_lines(content) {
            match self.classify(line) {
                LineKind::Generated => {}
                LineKind::Directive { spec, args } => {
                    output.push(line.to_string());
                    output.extend(spec.transform(file, args, self.resolver)?);
                }
                LineKind::Plain => output.push(line.to_string()),
            }
        }
        Ok(Some(output.join(self.line_ending.as_str())))
    }

    /// Removes all generated lines, leaving directive anchors in place.
    ///
    /// Returns `None` when the content has no directive marker.
    #[must_use]
    pub fn strip_generated(&self, content: &str) -> Option<String> {
        let content = strip_bom(content);
        if !contains_signature(content) {
            return None;
        }
        let kept: Vec<&str> = split_lines(content)
            .into_iter()
            .filter(|line| !self.directives.is_generated(line))
            .collect();
        Some(kept.join(self.line_ending.as_str()))
    }
}
