//! Build context handed to rule computations.
//!
//! Every read made through the context is recorded as a dependency of the
//! target being computed. Reads made any other way are invisible to the
//! engine and will not trigger a rebuild when they change.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Session;
use super::trace::Dependency;
use super::types::EngineError;
use crate::util::hash::hash_bytes;

/// Tracked access to files and other targets during one rule computation.
pub struct BuildCtx<'s, 'e> {
  session: &'s mut Session<'e>,
  target: PathBuf,
  deps: Vec<Dependency>,
}

impl<'s, 'e> BuildCtx<'s, 'e> {
  pub(crate) fn new(session: &'s mut Session<'e>, target: &Path) -> Self {
    Self {
      session,
      target: target.to_path_buf(),
      deps: Vec::new(),
    }
  }

  /// The target being computed.
  pub fn target(&self) -> &Path {
    &self.target
  }

  /// Read a file as UTF-8, recording its content hash.
  ///
  /// A missing file is recorded as absent so that creating it later
  /// invalidates the target.
  pub fn read_to_string(&mut self, path: &Path) -> io::Result<String> {
    match fs::read(path) {
      Ok(bytes) => {
        self.deps.push(Dependency::File {
          path: path.to_path_buf(),
          hash: Some(hash_bytes(&bytes)),
        });
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
      }
      Err(e) => {
        if e.kind() == io::ErrorKind::NotFound {
          self.deps.push(Dependency::File {
            path: path.to_path_buf(),
            hash: None,
          });
        }
        Err(e)
      }
    }
  }

  /// Check whether `path` is a regular file, recording the answer.
  pub fn file_exists(&mut self, path: &Path) -> bool {
    let exists = path.is_file();
    self.deps.push(Dependency::Exists {
      path: path.to_path_buf(),
      exists,
    });
    exists
  }

  /// Bring another target up to date and depend on its artifact.
  pub fn need(&mut self, target: &Path) -> Result<(), EngineError> {
    let hash = self.session.require(target)?;
    self.session.graph.add_dependency(&self.target, target);
    self.deps.push(Dependency::Target {
      path: target.to_path_buf(),
      hash,
    });
    Ok(())
  }

  /// [`need`](Self::need) a target, then read its artifact.
  pub fn read_artifact(&mut self, target: &Path) -> Result<String, EngineError> {
    self.need(target)?;
    fs::read_to_string(target).map_err(|source| EngineError::ReadArtifact {
      path: target.to_path_buf(),
      source,
    })
  }

  /// Dependencies recorded so far, in observation order.
  pub fn dependencies(&self) -> &[Dependency] {
    &self.deps
  }

  pub(crate) fn into_dependencies(self) -> Vec<Dependency> {
    self.deps
  }
}
