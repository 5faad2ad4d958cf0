//! Import extraction.
//!
//! An extractor turns source text into raw import references and maps each
//! reference onto a relative file path candidate. It never checks whether the
//! candidate exists; that is left to [`crate::resolve`].
//!
//! # Variants
//!
//! - [`ModuleImports`] - `import Foo.Bar` style, dotted module names
//! - [`QuotedIncludes`] - `#include "foo.h"` style, quoted paths
//!
//! New languages plug in by implementing [`ImportExtractor`]; nothing in the
//! dependency rules needs to change.

mod include;
mod module;

use std::path::PathBuf;

pub use include::QuotedIncludes;
pub use module::ModuleImports;

/// A textual import reference as written in the source, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawImport(pub String);

impl std::fmt::Display for RawImport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for RawImport {
  fn from(s: &str) -> Self {
    RawImport(s.to_string())
  }
}

/// Language-specific import recognition.
///
/// This is a best-effort line scan, not a parser: continuation lines,
/// import-like text in comments and conditional compilation are not handled.
pub trait ImportExtractor: Send + Sync {
  /// Scan `source` and return the raw references in the order they appear.
  fn extract(&self, source: &str) -> Vec<RawImport>;

  /// Map a raw reference onto a path relative to a search root.
  fn candidate_path(&self, import: &RawImport) -> PathBuf;
}
