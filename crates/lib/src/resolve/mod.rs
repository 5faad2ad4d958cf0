//! Search-root path resolution.
//!
//! Roots are a priority order: the first root that holds the file wins, even
//! when later roots hold a file of the same name.

use std::path::{Path, PathBuf};

/// Return the first root under which `relative` exists as a regular file.
///
/// The existence check is supplied by the caller so that it can be recorded
/// as a tracked read when this runs inside a build rule. `None` means no root
/// holds the file, which callers treat as "not a trackable source".
pub fn find_in_roots<'a, F>(roots: &'a [PathBuf], relative: &Path, mut is_file: F) -> Option<&'a Path>
where
  F: FnMut(&Path) -> bool,
{
  roots.iter().map(PathBuf::as_path).find(|root| is_file(&root.join(relative)))
}

/// Untracked variant of [`find_in_roots`] that asks the filesystem directly.
pub fn resolve(roots: &[PathBuf], relative: &Path) -> Option<PathBuf> {
  find_in_roots(roots, relative, |p| p.is_file()).map(Path::to_path_buf)
}
