//! Rule registration.
//!
//! A rule pairs a target predicate with the computation that produces the
//! target's bytes. The engine owns writing the bytes; rules only compute them.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::context::BuildCtx;
use super::types::EngineError;

/// Error type returned by rule computations.
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// Output of a rule computation: the artifact bytes.
pub type RuleResult = Result<Vec<u8>, RuleError>;

type MatchFn = dyn Fn(&Path) -> bool + Send + Sync;
type RunFn = dyn Fn(&mut BuildCtx<'_, '_>, &Path) -> RuleResult + Send + Sync;

/// A named target pattern with its computation.
#[derive(Clone)]
pub struct Rule {
  name: String,
  matches: Arc<MatchFn>,
  run: Arc<RunFn>,
}

impl Rule {
  pub fn new<M, R>(name: impl Into<String>, matches: M, run: R) -> Self
  where
    M: Fn(&Path) -> bool + Send + Sync + 'static,
    R: Fn(&mut BuildCtx<'_, '_>, &Path) -> RuleResult + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      matches: Arc::new(matches),
      run: Arc::new(run),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Returns true if this rule produces `target`.
  pub fn matches(&self, target: &Path) -> bool {
    (self.matches)(target)
  }

  pub(crate) fn run(&self, ctx: &mut BuildCtx<'_, '_>, target: &Path) -> RuleResult {
    (self.run)(ctx, target)
  }
}

impl fmt::Debug for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
  }
}

/// The set of rules known to an engine.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
  rules: Vec<Rule>,
}

impl RuleSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, rule: Rule) {
    self.rules.push(rule);
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Rule> {
    self.rules.iter()
  }

  /// Find the single rule producing `target`.
  ///
  /// # Errors
  ///
  /// `NoRule` if nothing matches, `AmbiguousRule` if more than one rule does.
  pub fn find(&self, target: &Path) -> Result<&Rule, EngineError> {
    let mut matching = self.rules.iter().filter(|r| r.matches(target));
    let Some(first) = matching.next() else {
      return Err(EngineError::NoRule(target.to_path_buf()));
    };

    let rest: Vec<&Rule> = matching.collect();
    if !rest.is_empty() {
      let rules = std::iter::once(first).chain(rest).map(|r| r.name.clone()).collect();
      return Err(EngineError::AmbiguousRule {
        target: target.to_path_buf(),
        rules,
      });
    }

    Ok(first)
  }
}
