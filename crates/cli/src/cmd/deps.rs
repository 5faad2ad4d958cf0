use std::path::Path;

use anyhow::{Context, Result, bail};

use depcache_lib::config::Project;
use depcache_lib::deps::{ArtifactKind, open_engine, relative_source};
use depcache_lib::query;

use crate::output::{OutputFormat, emit_json, path_list};

pub fn cmd_deps(project: &Project, file: &Path, transitive: bool, output: OutputFormat) -> Result<()> {
  let source = relative_source(project, file).context("Invalid source path")?;
  let kind = if transitive {
    ArtifactKind::Transitive
  } else {
    ArtifactKind::Direct
  };

  let output_root = project.output_root();
  let target = kind.artifact_path(&output_root, &source);

  let mut engine = open_engine(project).context("Failed to set up dependency rules")?;
  let report = engine
    .build(std::slice::from_ref(&target))
    .context("Failed to build dependency artifacts")?;
  if let Some(e) = report.failure(&target) {
    bail!("{}", e);
  }

  let imports = query::load(kind, &output_root, &source)?;

  if output.is_json() {
    emit_json(&serde_json::json!({ "file": source, "kind": kind, "imports": imports }))?;
  } else {
    path_list(&imports, 0);
  }

  Ok(())
}
