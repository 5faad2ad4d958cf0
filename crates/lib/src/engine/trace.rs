//! Persisted build traces.
//!
//! A trace records, for one target, the rule that produced it, the hash of
//! the bytes it produced and every dependency the computation observed, in
//! the order observed. On the next run the engine replays these checks to
//! decide whether the target is still up to date.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::EngineError;
use crate::util::fs::write_if_changed;
use crate::util::hash::ContentHash;

/// Trace database format version. Databases with another version are discarded.
pub const TRACE_DB_VERSION: u32 = 1;

/// One dependency observed while computing a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dependency {
  /// A file whose contents were read. `hash` is `None` if it did not exist.
  File { path: PathBuf, hash: Option<ContentHash> },

  /// A file whose existence was checked.
  Exists { path: PathBuf, exists: bool },

  /// Another target, with the hash of its artifact when it was used.
  Target { path: PathBuf, hash: ContentHash },
}

impl Dependency {
  pub fn path(&self) -> &Path {
    match self {
      Dependency::File { path, .. } | Dependency::Exists { path, .. } | Dependency::Target { path, .. } => path,
    }
  }
}

/// Everything needed to decide whether a target is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
  /// Name of the rule that produced the target.
  pub rule: String,
  /// Hash of the artifact bytes the rule produced.
  pub output_hash: ContentHash,
  /// Observed dependencies, in observation order.
  pub deps: Vec<Dependency>,
}

/// All traces for one output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceDb {
  version: u32,
  traces: BTreeMap<PathBuf, Trace>,
}

impl Default for TraceDb {
  fn default() -> Self {
    Self {
      version: TRACE_DB_VERSION,
      traces: BTreeMap::new(),
    }
  }
}

impl TraceDb {
  /// Load the database at `path`.
  ///
  /// A missing file yields an empty database. An unreadable, corrupted or
  /// out-of-date file is discarded with a warning, which makes every target
  /// rebuild once.
  pub fn load(path: &Path) -> Self {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no trace database, starting fresh");
        return Self::default();
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "failed to read trace database, discarding");
        return Self::default();
      }
    };

    match serde_json::from_str::<TraceDb>(&content) {
      Ok(db) if db.version == TRACE_DB_VERSION => {
        debug!(path = %path.display(), traces = db.traces.len(), "loaded trace database");
        db
      }
      Ok(db) => {
        warn!(
          path = %path.display(),
          found = db.version,
          expected = TRACE_DB_VERSION,
          "trace database version mismatch, discarding"
        );
        Self::default()
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "corrupted trace database, discarding");
        Self::default()
      }
    }
  }

  /// Persist the database, leaving the file untouched if nothing changed.
  pub fn save(&self, path: &Path) -> Result<(), EngineError> {
    let save_err = |message: String| EngineError::SaveTraces {
      path: path.to_path_buf(),
      message,
    };
    let json = serde_json::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
    write_if_changed(path, format!("{}\n", json).as_bytes()).map_err(|e| save_err(e.to_string()))?;
    Ok(())
  }

  pub fn get(&self, target: &Path) -> Option<&Trace> {
    self.traces.get(target)
  }

  pub fn insert(&mut self, target: PathBuf, trace: Trace) {
    self.traces.insert(target, trace);
  }

  pub fn remove(&mut self, target: &Path) -> Option<Trace> {
    self.traces.remove(target)
  }

  pub fn len(&self) -> usize {
    self.traces.len()
  }

  pub fn is_empty(&self) -> bool {
    self.traces.is_empty()
  }

  pub fn targets(&self) -> impl Iterator<Item = &Path> {
    self.traces.keys().map(PathBuf::as_path)
  }
}
