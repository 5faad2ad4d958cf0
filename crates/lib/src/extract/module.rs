//! Dotted-module import statements (`import qualified Data.Map as M`).

use std::path::PathBuf;

use regex::Regex;

use super::{ImportExtractor, RawImport};

/// Extractor for module-style imports.
///
/// A line is an import when it starts with the keyword followed by
/// whitespace. The module is the longest run of alphanumerics, dots and
/// underscores starting at the first uppercase letter after the keyword, so
/// lowercase qualifiers such as `qualified` or `safe` are skipped.
#[derive(Debug, Clone)]
pub struct ModuleImports {
  extension: String,
  pattern: Regex,
}

impl ModuleImports {
  /// Create an extractor for `keyword`, mapping modules onto `.<extension>` files.
  pub fn new(keyword: &str, extension: &str) -> Result<Self, regex::Error> {
    let pattern = Regex::new(&format!(
      r"^{}\s[^\p{{Lu}}]*(\p{{Lu}}[\p{{Alphabetic}}\p{{N}}._]*)",
      regex::escape(keyword)
    ))?;
    Ok(Self {
      extension: extension.trim_start_matches('.').to_string(),
      pattern,
    })
  }

  /// File extension appended to candidate paths (without the dot).
  pub fn extension(&self) -> &str {
    &self.extension
  }
}

impl ImportExtractor for ModuleImports {
  fn extract(&self, source: &str) -> Vec<RawImport> {
    source
      .lines()
      .filter_map(|line| self.pattern.captures(line))
      .filter_map(|caps| caps.get(1))
      .map(|m| RawImport(m.as_str().to_string()))
      .collect()
  }

  /// Every dot becomes a separator, then `.<extension>` is appended, so a
  /// trailing dot leaves an empty final stem (`Foo.` maps to `Foo/.hs`).
  fn candidate_path(&self, import: &RawImport) -> PathBuf {
    PathBuf::from(format!("{}.{}", import.0.replace('.', "/"), self.extension))
  }
}
