//! Directive-driven source rewriting.
//!
//! A run indexes the target files once, then regenerates the output of
//! every `///ts:` directive in each changed file.

pub mod directive;
pub mod engine;
pub mod index;
pub mod paths;
pub mod resolve;
pub mod rewrite;

pub use directive::{DirectiveKind, DirectiveSet, DirectiveSpec};
pub use engine::{FileOutcome, FileStatus, Mode, RunReport, TransformEngine};
pub use index::TargetIndex;
pub use resolve::{NameResolver, ResolveOptions};
pub use rewrite::LineRewriter;
