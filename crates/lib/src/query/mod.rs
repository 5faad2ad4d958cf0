//! Reading dependency artifacts.
//!
//! [`direct_imports`] and [`transitive_imports`] are meant for other rules:
//! they bring the artifact up to date and record it as a dependency of the
//! calling target. [`load`] reads whatever is on disk without a build.

use std::fs;
use std::path::{Path, PathBuf};

use crate::deps::artifact;
use crate::deps::{ArtifactKind, DepsError};
use crate::engine::{BuildCtx, EngineError};

/// Direct imports of the project-relative `file`, as project-relative paths.
pub fn direct_imports(
  ctx: &mut BuildCtx<'_, '_>,
  output_root: &Path,
  file: &Path,
) -> Result<Vec<PathBuf>, EngineError> {
  imports(ctx, ArtifactKind::Direct, output_root, file)
}

/// Transitive imports of the project-relative `file`, as project-relative paths.
pub fn transitive_imports(
  ctx: &mut BuildCtx<'_, '_>,
  output_root: &Path,
  file: &Path,
) -> Result<Vec<PathBuf>, EngineError> {
  imports(ctx, ArtifactKind::Transitive, output_root, file)
}

fn imports(
  ctx: &mut BuildCtx<'_, '_>,
  kind: ArtifactKind,
  output_root: &Path,
  file: &Path,
) -> Result<Vec<PathBuf>, EngineError> {
  let text = ctx.read_artifact(&kind.artifact_path(output_root, file))?;
  Ok(artifact::parse(&text))
}

/// Read an artifact straight from disk.
pub fn load(kind: ArtifactKind, output_root: &Path, file: &Path) -> Result<Vec<PathBuf>, DepsError> {
  let path = kind.artifact_path(output_root, file);
  let text = fs::read_to_string(&path).map_err(|source| DepsError::ReadArtifact { path, source })?;
  Ok(artifact::parse(&text))
}
