//! Types for target execution.
//!
//! This module defines the error type, statistics and report for engine
//! sessions.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::graph::TaskGraph;
use super::rules::RuleError;

/// Errors that can occur while bringing targets up to date.
#[derive(Debug, Error)]
pub enum EngineError {
  /// No registered rule produces the target.
  #[error("no rule to build {}", .0.display())]
  NoRule(PathBuf),

  /// More than one registered rule produces the target.
  #[error("multiple rules match {}: {}", .target.display(), .rules.join(", "))]
  AmbiguousRule { target: PathBuf, rules: Vec<String> },

  /// A target was required while it was still being computed.
  #[error("dependency cycle detected: {}", format_chain(.chain))]
  Cycle { chain: Vec<PathBuf> },

  /// The target already failed earlier in this session.
  #[error("dependency failed: {}", .0.display())]
  DependencyFailed(PathBuf),

  /// The rule's computation returned an error.
  #[error("failed to build {}: {source}", .target.display())]
  Rule {
    target: PathBuf,
    #[source]
    source: RuleError,
  },

  /// Writing the computed artifact failed.
  #[error("failed to write artifact {}: {source}", .path.display())]
  WriteArtifact {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Reading a freshly built artifact failed.
  #[error("failed to read artifact {}: {source}", .path.display())]
  ReadArtifact {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Persisting the trace database failed.
  #[error("failed to save trace database {}: {message}", .path.display())]
  SaveTraces { path: PathBuf, message: String },
}

fn format_chain(chain: &[PathBuf]) -> String {
  chain
    .iter()
    .map(|p| p.display().to_string())
    .collect::<Vec<_>>()
    .join(" -> ")
}

impl EngineError {
  /// Returns true if this error is a dependency cycle.
  pub fn is_cycle(&self) -> bool {
    matches!(self, EngineError::Cycle { .. })
  }
}

/// Counters collected during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
  /// Targets explicitly requested by the caller.
  pub requested: usize,
  /// Targets whose rule ran.
  pub rebuilt: usize,
  /// Targets found up to date without running their rule.
  pub clean: usize,
  /// Rebuilt targets whose artifact bytes changed and were written.
  pub written: usize,
  /// Rebuilt targets that reproduced the existing artifact byte for byte.
  pub unchanged: usize,
  /// Targets that failed, including dependency failures.
  pub failed: usize,
}

/// Result of [`crate::engine::Engine::build`].
#[derive(Debug, Default)]
pub struct BuildReport {
  pub stats: BuildStats,

  /// Requested targets that failed, with the error that stopped them.
  pub failed: Vec<(PathBuf, EngineError)>,

  /// Dependency edges discovered during the session.
  pub graph: TaskGraph,
}

impl BuildReport {
  /// Returns true if every requested target was brought up to date.
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }

  /// Error for a requested target, if it failed.
  pub fn failure(&self, target: &Path) -> Option<&EngineError> {
    self.failed.iter().find(|(t, _)| t == target).map(|(_, e)| e)
  }
}
