//! Quoted include directives (`#include "foo.h"`).

use std::path::PathBuf;

use super::{ImportExtractor, RawImport};

/// Extractor for C-like quoted includes.
///
/// A line counts only when it splits into exactly two whitespace-separated
/// tokens: the keyword and a double-quoted literal. Angle-bracket includes
/// are system headers and are ignored.
#[derive(Debug, Clone)]
pub struct QuotedIncludes {
  keyword: String,
}

impl QuotedIncludes {
  pub fn new(keyword: &str) -> Self {
    Self {
      keyword: keyword.to_string(),
    }
  }
}

impl Default for QuotedIncludes {
  fn default() -> Self {
    Self::new(crate::consts::DEFAULT_INCLUDE_KEYWORD)
  }
}

impl ImportExtractor for QuotedIncludes {
  fn extract(&self, source: &str) -> Vec<RawImport> {
    source
      .lines()
      .filter_map(|line| {
        let mut tokens = line.split_whitespace();
        let (Some(keyword), Some(literal), None) = (tokens.next(), tokens.next(), tokens.next()) else {
          return None;
        };
        if keyword != self.keyword {
          return None;
        }
        literal
          .strip_prefix('"')
          .and_then(|rest| rest.strip_suffix('"'))
          .map(|inner| RawImport(inner.to_string()))
      })
      .collect()
  }

  fn candidate_path(&self, import: &RawImport) -> PathBuf {
    PathBuf::from(&import.0)
  }
}
