//! Artifact text format: one project-relative path per line, each line
//! terminated by a newline. An empty list is an empty file.

use std::path::{Path, PathBuf};

use super::types::DepsError;
use crate::util::fs::normalize_path;

/// Render paths as artifact text.
pub fn render(paths: &[PathBuf]) -> Result<String, DepsError> {
  let mut out = String::new();
  for path in paths {
    let line = path
      .to_str()
      .filter(|s| !s.is_empty() && !s.contains('\n') && !s.contains('\r'))
      .ok_or_else(|| DepsError::InvalidArtifactPath(path.clone()))?;
    out.push_str(line);
    out.push('\n');
  }
  Ok(out)
}

/// Parse artifact text. Every non-empty line is taken literally as a path.
pub fn parse(text: &str) -> Vec<PathBuf> {
  text.lines().filter(|l| !l.is_empty()).map(PathBuf::from).collect()
}

/// Express `path` relative to `prefix`, after lexical normalization.
pub fn relative_to(prefix: &Path, path: &Path) -> Result<PathBuf, DepsError> {
  let normalized = normalize_path(path);
  normalized
    .strip_prefix(prefix)
    .map(Path::to_path_buf)
    .map_err(|_| DepsError::PathOutsideRoot {
      path: path.to_path_buf(),
      prefix: prefix.to_path_buf(),
    })
}
