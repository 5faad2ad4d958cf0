use std::time::Instant;

use anyhow::{Context, Result};

use depcache_lib::config::Project;
use depcache_lib::gc::collect_garbage;

use crate::output::{OutputFormat, Tone, elapsed, emit_json, field, headline, path_list, size};

pub fn cmd_gc(project: &Project, dry_run: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let result = collect_garbage(project, dry_run).context("Garbage collection failed")?;

  if output.is_json() {
    emit_json(&result)?;
  } else {
    if dry_run {
      headline(Tone::Note, "Dry run, nothing removed. Would remove:");
      path_list(&result.deleted_paths, 2);
    } else {
      headline(Tone::Done, "Garbage collection complete");
    }
    field("Artifacts scanned", result.stats.artifacts_scanned);
    field("Artifacts removed", result.stats.artifacts_deleted);
    field("Traces removed", result.stats.traces_removed);
    field("Space freed", size(result.stats.bytes_freed));
    field("Duration", elapsed(start.elapsed()));
  }

  Ok(())
}
