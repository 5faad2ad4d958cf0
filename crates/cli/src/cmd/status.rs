//! Status command implementation.
//!
//! Summarizes the project layout and what is currently cached.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use depcache_lib::config::Project;
use depcache_lib::deps::{ArtifactKind, discover_sources, list_artifacts};
use depcache_lib::engine::TraceDb;

use crate::output::{OutputFormat, Tone, emit_json, field, headline};

#[derive(Serialize)]
struct StatusOutput {
  root: PathBuf,
  output_root: PathBuf,
  sources: usize,
  direct_artifacts: usize,
  transitive_artifacts: usize,
  traces: usize,
}

pub fn cmd_status(project: &Project, output: OutputFormat) -> Result<()> {
  let artifacts = list_artifacts(project);
  let count = |kind: ArtifactKind| artifacts.iter().filter(|a| a.kind == kind).count();

  let status = StatusOutput {
    root: project.root().to_path_buf(),
    output_root: project.output_root(),
    sources: discover_sources(project).len(),
    direct_artifacts: count(ArtifactKind::Direct),
    transitive_artifacts: count(ArtifactKind::Transitive),
    traces: TraceDb::load(&project.trace_db_path()).len(),
  };

  if output.is_json() {
    emit_json(&status)?;
  } else {
    headline(Tone::Note, &format!("Project: {}", status.root.display()));
    field("Output", status.output_root.display());
    field("Sources", status.sources);
    field("Direct artifacts", status.direct_artifacts);
    field("Transitive artifacts", status.transitive_artifacts);
    field("Traces", status.traces);
  }

  Ok(())
}
