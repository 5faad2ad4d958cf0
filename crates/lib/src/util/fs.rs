//! Filesystem helpers.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

/// Write `contents` to `path` unless the file already holds exactly those bytes.
///
/// Returns `true` if the file was written. An unchanged file is left alone so
/// its modification time stays put. New content goes to a temporary file in
/// the same directory and is renamed into place.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> io::Result<bool> {
  match fs::read(path) {
    Ok(existing) if existing == contents => return Ok(false),
    Ok(_) => {}
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(e),
  }

  let parent = match path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent)?;

  let mut tmp = NamedTempFile::new_in(parent)?;
  tmp.write_all(contents)?;
  tmp.flush()?;
  tmp.persist(path).map_err(|e| e.error)?;
  Ok(true)
}

/// Lexically normalize a path: drop `.` components and fold `..` into its parent.
///
/// A leading `..` that cannot be folded is kept. The filesystem is never touched.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
        if can_pop {
          out.pop();
        } else if !out.has_root() {
          out.push("..");
        }
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}
