//! Dynamic task graph.
//!
//! Edges are added while targets run, as each computation discovers what it
//! needs; nothing is declared up front. An edge `a -> b` means "a needed b".

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::EngineError;

/// Targets and the dependency edges observed between them.
#[derive(Debug, Default, Clone)]
pub struct TaskGraph {
  graph: DiGraph<PathBuf, ()>,
  nodes: HashMap<PathBuf, NodeIndex>,
}

impl TaskGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a target if it isn't already present.
  pub fn add_task(&mut self, target: &Path) -> NodeIndex {
    if let Some(&idx) = self.nodes.get(target) {
      return idx;
    }
    let idx = self.graph.add_node(target.to_path_buf());
    self.nodes.insert(target.to_path_buf(), idx);
    idx
  }

  /// Record that `dependent` needed `dependency`.
  pub fn add_dependency(&mut self, dependent: &Path, dependency: &Path) {
    let from = self.add_task(dependent);
    let to = self.add_task(dependency);
    if !self.graph.contains_edge(from, to) {
      self.graph.add_edge(from, to, ());
    }
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  /// Direct dependencies of `target`, sorted.
  pub fn dependencies(&self, target: &Path) -> Vec<&Path> {
    let Some(&idx) = self.nodes.get(target) else {
      return Vec::new();
    };
    let mut out: Vec<&Path> = self
      .graph
      .neighbors_directed(idx, Direction::Outgoing)
      .map(|n| self.graph[n].as_path())
      .collect();
    out.sort();
    out
  }

  /// Targets ordered so that every dependency comes before its dependents.
  ///
  /// # Errors
  ///
  /// Returns `Cycle` if the recorded edges are not acyclic.
  pub fn build_order(&self) -> Result<Vec<PathBuf>, EngineError> {
    let sorted = toposort(&self.graph, None).map_err(|cycle| EngineError::Cycle {
      chain: vec![self.graph[cycle.node_id()].clone()],
    })?;
    Ok(sorted.into_iter().rev().map(|idx| self.graph[idx].clone()).collect())
  }
}
