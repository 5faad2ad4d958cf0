//! Incremental target engine.
//!
//! A small, synchronous build engine in the style of Shake and PIE:
//! - Rules are matched against target paths ([`RuleSet`])
//! - Rules read inputs through a [`BuildCtx`], which records every file,
//!   existence check and target they touch
//! - Each target is computed at most once per [`Session`]
//! - A target is rebuilt only when a recorded dependency changed, checked in
//!   the order it was observed
//! - Artifacts are written only when their bytes change, and dependents
//!   compare artifact hashes, so an identical rebuild stops propagating
//!
//! Requiring a target that is still being computed yields
//! [`EngineError::Cycle`] with the chain of targets involved. Rules may handle
//! that error themselves; otherwise the target fails.

pub mod context;
pub mod graph;
pub mod rules;
pub mod trace;
pub mod types;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::util::fs::write_if_changed;
use crate::util::hash::{ContentHash, hash_bytes, hash_file_if_exists};

pub use context::BuildCtx;
pub use graph::TaskGraph;
pub use rules::{Rule, RuleError, RuleResult, RuleSet};
pub use trace::{Dependency, Trace, TraceDb};
pub use types::{BuildReport, BuildStats, EngineError};

/// Rules plus the persisted traces of everything they have built.
#[derive(Debug)]
pub struct Engine {
  rules: RuleSet,
  traces: TraceDb,
  db_path: Option<PathBuf>,
}

impl Engine {
  /// Open an engine whose traces live at `db_path`.
  pub fn open(rules: RuleSet, db_path: impl Into<PathBuf>) -> Self {
    let db_path = db_path.into();
    let traces = TraceDb::load(&db_path);
    Self {
      rules,
      traces,
      db_path: Some(db_path),
    }
  }

  /// An engine that keeps traces in memory only.
  pub fn in_memory(rules: RuleSet) -> Self {
    Self {
      rules,
      traces: TraceDb::default(),
      db_path: None,
    }
  }

  pub fn rules(&self) -> &RuleSet {
    &self.rules
  }

  pub fn traces(&self) -> &TraceDb {
    &self.traces
  }

  pub fn traces_mut(&mut self) -> &mut TraceDb {
    &mut self.traces
  }

  /// Start a session. Only one session can be active at a time.
  pub fn session(&mut self) -> Session<'_> {
    Session::new(&self.rules, &mut self.traces)
  }

  /// Bring every target in `targets` up to date.
  ///
  /// Failures do not stop the remaining targets; they are collected in the
  /// report. Traces are saved afterwards even if some targets failed.
  ///
  /// # Errors
  ///
  /// Only fails if the trace database cannot be saved.
  pub fn build(&mut self, targets: &[PathBuf]) -> Result<BuildReport, EngineError> {
    info!(targets = targets.len(), rules = self.rules.len(), "starting build");

    let mut session = self.session();
    let mut failed = Vec::new();

    for target in targets {
      session.stats.requested += 1;
      if let Err(e) = session.require(target) {
        error!(artifact = %target.display(), error = %e, "target failed");
        failed.push((target.clone(), e));
      }
    }

    let (stats, graph) = session.finish();
    self.save()?;

    info!(
      rebuilt = stats.rebuilt,
      clean = stats.clean,
      written = stats.written,
      unchanged = stats.unchanged,
      failed = failed.len(),
      "build complete"
    );

    Ok(BuildReport { stats, failed, graph })
  }

  /// Persist traces, if this engine has a database path.
  pub fn save(&self) -> Result<(), EngineError> {
    if let Some(path) = &self.db_path {
      self.traces.save(path)?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
enum TaskState {
  InProgress,
  Done(ContentHash),
  Failed,
}

/// One build: memoizes target results and detects cycles.
pub struct Session<'e> {
  rules: &'e RuleSet,
  traces: &'e mut TraceDb,
  state: HashMap<PathBuf, TaskState>,
  stack: Vec<PathBuf>,
  graph: TaskGraph,
  stats: BuildStats,
}

impl<'e> Session<'e> {
  fn new(rules: &'e RuleSet, traces: &'e mut TraceDb) -> Self {
    Self {
      rules,
      traces,
      state: HashMap::new(),
      stack: Vec::new(),
      graph: TaskGraph::new(),
      stats: BuildStats::default(),
    }
  }

  /// Bring `target` up to date and return the hash of its artifact.
  pub fn require(&mut self, target: &Path) -> Result<ContentHash, EngineError> {
    match self.state.get(target) {
      Some(TaskState::Done(hash)) => return Ok(hash.clone()),
      Some(TaskState::Failed) => return Err(EngineError::DependencyFailed(target.to_path_buf())),
      Some(TaskState::InProgress) => return Err(self.cycle_error(target)),
      None => {}
    }

    self.graph.add_task(target);
    self.state.insert(target.to_path_buf(), TaskState::InProgress);
    self.stack.push(target.to_path_buf());

    let rules = self.rules;
    let result = rules.find(target).and_then(|rule| self.bring_up_to_date(rule, target));

    self.stack.pop();
    match result {
      Ok(hash) => {
        self.state.insert(target.to_path_buf(), TaskState::Done(hash.clone()));
        Ok(hash)
      }
      Err(e) => {
        self.state.insert(target.to_path_buf(), TaskState::Failed);
        self.stats.failed += 1;
        Err(e)
      }
    }
  }

  pub fn stats(&self) -> &BuildStats {
    &self.stats
  }

  /// End the session, returning what it did.
  pub fn finish(self) -> (BuildStats, TaskGraph) {
    (self.stats, self.graph)
  }

  fn cycle_error(&self, target: &Path) -> EngineError {
    let start = self.stack.iter().position(|t| t == target).unwrap_or(0);
    let mut chain = self.stack[start..].to_vec();
    chain.push(target.to_path_buf());
    EngineError::Cycle { chain }
  }

  fn bring_up_to_date(&mut self, rule: &Rule, target: &Path) -> Result<ContentHash, EngineError> {
    if let Some(hash) = self.check_trace(rule, target) {
      debug!(artifact = %target.display(), "up to date");
      self.stats.clean += 1;
      return Ok(hash);
    }

    info!(artifact = %target.display(), rule = rule.name(), "building");

    let mut ctx = BuildCtx::new(self, target);
    let output = rule.run(&mut ctx, target);
    let deps = ctx.into_dependencies();

    let bytes = output.map_err(|source| EngineError::Rule {
      target: target.to_path_buf(),
      source,
    })?;
    let hash = hash_bytes(&bytes);

    let written = write_if_changed(target, &bytes).map_err(|source| EngineError::WriteArtifact {
      path: target.to_path_buf(),
      source,
    })?;

    self.stats.rebuilt += 1;
    if written {
      self.stats.written += 1;
    } else {
      self.stats.unchanged += 1;
      debug!(artifact = %target.display(), "artifact unchanged, left in place");
    }

    self.traces.insert(
      target.to_path_buf(),
      Trace {
        rule: rule.name().to_string(),
        output_hash: hash.clone(),
        deps,
      },
    );

    Ok(hash)
  }

  /// Returns the recorded output hash if `target` is still up to date.
  fn check_trace(&mut self, rule: &Rule, target: &Path) -> Option<ContentHash> {
    let trace = self.traces.get(target)?.clone();

    if trace.rule != rule.name() {
      debug!(artifact = %target.display(), previous = %trace.rule, "rule changed");
      return None;
    }

    if hash_file_if_exists(target).as_ref() != Some(&trace.output_hash) {
      debug!(artifact = %target.display(), "artifact missing or modified");
      return None;
    }

    for dep in &trace.deps {
      if !self.dependency_unchanged(target, dep) {
        debug!(
          artifact = %target.display(),
          dependency = %dep.path().display(),
          "dependency changed"
        );
        return None;
      }
    }

    Some(trace.output_hash)
  }

  fn dependency_unchanged(&mut self, target: &Path, dep: &Dependency) -> bool {
    match dep {
      Dependency::File { path, hash } => hash_file_if_exists(path) == *hash,
      Dependency::Exists { path, exists } => path.is_file() == *exists,
      Dependency::Target { path, hash } => match self.require(path) {
        Ok(current) => {
          self.graph.add_dependency(target, path);
          current == *hash
        }
        // Rerun the rule; if it still needs the target it reports the failure itself.
        Err(e) => {
          debug!(dependency = %path.display(), error = %e, "dependency failed during check");
          false
        }
      },
    }
  }
}
