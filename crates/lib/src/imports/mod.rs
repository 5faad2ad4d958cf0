//! Direct-import resolution: extract, map to candidates, resolve.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::deps::DepsError;
use crate::engine::BuildCtx;
use crate::extract::ImportExtractor;
use crate::resolve::find_in_roots;
use crate::util::fs::normalize_path;

/// Resolve the imports of `source` against `roots`.
///
/// The source read and every existence probe go through `ctx`, so the
/// calling target is rebuilt when the source changes or when a probed
/// candidate appears or disappears. References that resolve nowhere are
/// dropped. The result keeps extraction order and is not deduplicated.
///
/// # Errors
///
/// Returns [`DepsError::ReadSource`] if `source` cannot be read.
pub fn compute_direct_imports(
  ctx: &mut BuildCtx<'_, '_>,
  source: &Path,
  extractor: &dyn ImportExtractor,
  roots: &[PathBuf],
) -> Result<Vec<PathBuf>, DepsError> {
  let text = ctx.read_to_string(source).map_err(|e| DepsError::ReadSource {
    path: source.to_path_buf(),
    source: e,
  })?;

  let mut resolved = Vec::new();
  for import in extractor.extract(&text) {
    let candidate = extractor.candidate_path(&import);
    match find_in_roots(roots, &candidate, |p| ctx.file_exists(p)) {
      Some(root) => resolved.push(normalize_path(&root.join(&candidate))),
      None => debug!(source = %source.display(), import = %import, "import not found in search roots"),
    }
  }

  Ok(resolved)
}
