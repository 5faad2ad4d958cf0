//! Error and artifact-kind types for the dependency rules.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::consts::{DIRECT_IMPORTS_SUFFIX, TRANSITIVE_IMPORTS_SUFFIX};
use crate::engine::EngineError;

/// Errors raised while computing or reading dependency artifacts.
#[derive(Debug, Error)]
pub enum DepsError {
  /// The source file itself could not be read. Fatal for its artifacts.
  #[error("failed to read source {}: {source}", path.display())]
  ReadSource { path: PathBuf, source: io::Error },

  /// A resolved path does not live under the project root.
  #[error("path {} is outside the expected prefix {}", path.display(), prefix.display())]
  PathOutsideRoot { path: PathBuf, prefix: PathBuf },

  /// A path cannot be written as one artifact line.
  #[error("path cannot be stored in an artifact: {}", .0.display())]
  InvalidArtifactPath(PathBuf),

  /// The target is not an artifact path under the output root.
  #[error("not a dependency artifact: {}", .0.display())]
  NotAnArtifact(PathBuf),

  /// An artifact could not be read outside a build.
  #[error("failed to read artifact {}: {source}", path.display())]
  ReadArtifact { path: PathBuf, source: io::Error },

  #[error("invalid import pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error(transparent)]
  Engine(#[from] EngineError),
}

/// The two artifacts kept per source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
  Direct,
  Transitive,
}

impl ArtifactKind {
  pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Direct, ArtifactKind::Transitive];

  pub fn suffix(self) -> &'static str {
    match self {
      ArtifactKind::Direct => DIRECT_IMPORTS_SUFFIX,
      ArtifactKind::Transitive => TRANSITIVE_IMPORTS_SUFFIX,
    }
  }

  /// `<output_root>/<source><suffix>` for a project-relative `source`.
  pub fn artifact_path(self, output_root: &Path, source: &Path) -> PathBuf {
    let mut path = output_root.join(source).into_os_string();
    path.push(self.suffix());
    PathBuf::from(path)
  }

  /// Recover the project-relative source path from an artifact path.
  ///
  /// Returns `None` when `artifact` is not under `output_root` or does not
  /// carry this kind's suffix.
  pub fn source_of(self, output_root: &Path, artifact: &Path) -> Option<PathBuf> {
    let relative = artifact.strip_prefix(output_root).ok()?.to_str()?;
    let source = relative.strip_suffix(self.suffix())?;
    if source.is_empty() || source.ends_with('/') || source.ends_with(std::path::MAIN_SEPARATOR) {
      return None;
    }
    Some(PathBuf::from(source))
  }

  /// Determine which kind of artifact `artifact` is, and for which source.
  pub fn classify(output_root: &Path, artifact: &Path) -> Option<(ArtifactKind, PathBuf)> {
    Self::ALL
      .into_iter()
      .find_map(|kind| kind.source_of(output_root, artifact).map(|source| (kind, source)))
  }
}

impl std::fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ArtifactKind::Direct => write!(f, "direct"),
      ArtifactKind::Transitive => write!(f, "transitive"),
    }
  }
}
