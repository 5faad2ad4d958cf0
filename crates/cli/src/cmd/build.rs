//! Build command implementation.
//!
//! Brings the direct and transitive artifacts of the requested sources up to
//! date and reports what the engine did.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use depcache_lib::config::Project;
use depcache_lib::deps::{artifact_targets, discover_sources, open_engine, relative_source};
use depcache_lib::engine::{BuildStats, TaskGraph};

use crate::output::{OutputFormat, Tone, elapsed, emit_json, field, headline, plural, project_relative};

#[derive(Serialize)]
struct BuildOutput<'a> {
  sources: usize,
  stats: &'a BuildStats,
  failed: Vec<FailedTarget>,
  build_order: Vec<OrderedTarget>,
}

#[derive(Serialize)]
struct FailedTarget {
  target: PathBuf,
  error: String,
}

/// A target in dependencies-first order, with the targets it needed.
#[derive(Serialize)]
struct OrderedTarget {
  target: PathBuf,
  needs: Vec<PathBuf>,
}

fn build_order(root: &Path, graph: &TaskGraph) -> Result<Vec<OrderedTarget>> {
  let order = graph.build_order().context("Failed to order build targets")?;
  Ok(
    order
      .iter()
      .map(|target| OrderedTarget {
        target: project_relative(root, target),
        needs: graph
          .dependencies(target)
          .into_iter()
          .map(|dep| project_relative(root, dep))
          .collect(),
      })
      .collect(),
  )
}

pub fn cmd_build(project: &Project, files: &[PathBuf], output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let sources = if files.is_empty() {
    discover_sources(project)
  } else {
    files
      .iter()
      .map(|f| relative_source(project, f))
      .collect::<Result<Vec<_>, _>>()
      .context("Invalid source path")?
  };

  if sources.is_empty() && !output.is_json() {
    headline(Tone::Note, "No sources found");
    return Ok(());
  }

  let mut engine = open_engine(project).context("Failed to set up dependency rules")?;
  let report = engine
    .build(&artifact_targets(project, &sources))
    .context("Failed to build dependency artifacts")?;

  if output.is_json() {
    emit_json(&BuildOutput {
      sources: sources.len(),
      stats: &report.stats,
      failed: report
        .failed
        .iter()
        .map(|(target, e)| FailedTarget {
          target: target.clone(),
          error: e.to_string(),
        })
        .collect(),
      build_order: build_order(project.root(), &report.graph)?,
    })?;
  } else {
    for (_, e) in &report.failed {
      headline(Tone::Fail, &e.to_string());
    }

    if report.is_success() {
      headline(
        Tone::Done,
        &format!("Dependencies up to date ({})", plural(sources.len(), "source")),
      );
    } else {
      headline(Tone::Warn, &format!("{} failed", plural(report.failed.len(), "target")));
    }
    field("Targets visited", report.graph.len());
    field("Rebuilt", report.stats.rebuilt);
    field("Written", report.stats.written);
    field("Unchanged", report.stats.unchanged);
    field("Up to date", report.stats.clean);
    field("Duration", elapsed(start.elapsed()));
  }

  if !report.is_success() {
    bail!("{} failed", plural(report.failed.len(), "target"));
  }

  Ok(())
}
