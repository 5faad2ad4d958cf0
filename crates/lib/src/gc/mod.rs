//! Artifact garbage collection.
//!
//! Artifacts are never deleted by the build itself. Once a source file is
//! removed, its artifacts and traces linger until [`collect_garbage`] sweeps
//! them.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Project;
use crate::deps::{ArtifactKind, list_artifacts};
use crate::engine::{EngineError, TraceDb};

#[derive(Debug, Error)]
pub enum GcError {
  #[error(transparent)]
  SaveTraces(#[from] EngineError),
}

#[derive(Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct GcStats {
  pub artifacts_scanned: usize,
  pub artifacts_deleted: usize,
  pub bytes_freed: u64,
  pub traces_removed: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct GcResult {
  pub stats: GcStats,
  pub deleted_paths: Vec<PathBuf>,
}

fn source_exists(project: &Project, source: &Path) -> bool {
  project.root().join(source).is_file()
}

/// Remove artifacts, and their traces, whose source file no longer exists.
///
/// With `dry_run`, nothing is deleted and the trace database is left alone,
/// but the result reports what would have been removed.
pub fn collect_garbage(project: &Project, dry_run: bool) -> Result<GcResult, GcError> {
  let mut stats = GcStats::default();
  let mut deleted_paths = Vec::new();

  for entry in list_artifacts(project) {
    stats.artifacts_scanned += 1;
    if source_exists(project, &entry.source) {
      continue;
    }

    let size = fs::metadata(&entry.path).map(|m| m.len()).unwrap_or(0);
    debug!(path = %entry.path.display(), source = %entry.source.display(), "removing orphaned artifact");

    if !dry_run {
      if let Err(e) = fs::remove_file(&entry.path) {
        warn!(path = %entry.path.display(), error = %e, "failed to delete artifact");
        continue;
      }
    }

    stats.artifacts_deleted += 1;
    stats.bytes_freed += size;
    deleted_paths.push(entry.path);
  }

  let db_path = project.trace_db_path();
  let mut traces = TraceDb::load(&db_path);
  let output_root = project.output_root();
  let orphaned: Vec<PathBuf> = traces
    .targets()
    .filter(|target| {
      ArtifactKind::classify(&output_root, target).is_some_and(|(_, source)| !source_exists(project, &source))
    })
    .map(Path::to_path_buf)
    .collect();

  stats.traces_removed = orphaned.len();
  if !dry_run && !orphaned.is_empty() {
    for target in &orphaned {
      traces.remove(target);
    }
    traces.save(&db_path)?;
  }

  info!(
    artifacts_deleted = stats.artifacts_deleted,
    traces_removed = stats.traces_removed,
    bytes_freed = stats.bytes_freed,
    dry_run,
    "garbage collection complete"
  );

  Ok(GcResult { stats, deleted_paths })
}
