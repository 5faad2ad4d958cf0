//! Shared helpers for library scenario tests.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use depcache_lib::config::{Config, Project};
use depcache_lib::deps::{ArtifactKind, artifact_targets, open_engine};
use depcache_lib::engine::BuildReport;
use depcache_lib::query;
use tempfile::TempDir;

/// A throwaway project with the default configuration unless told otherwise.
pub struct Fixture {
  pub temp: TempDir,
  pub config: Config,
}

impl Fixture {
  pub fn new() -> Self {
    Self::with_config(Config::default())
  }

  pub fn with_config(config: Config) -> Self {
    Self {
      temp: TempDir::new().unwrap(),
      config,
    }
  }

  pub fn project(&self) -> Project {
    Project::new(self.temp.path(), self.config.clone()).unwrap()
  }

  /// Write a file relative to the project root.
  pub fn write(&self, relative: &str, content: &str) {
    let path = self.temp.path().join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn remove(&self, relative: &str) {
    std::fs::remove_file(self.temp.path().join(relative)).unwrap();
  }

  /// Build both artifacts of each source with a freshly opened engine.
  pub fn build(&self, sources: &[&str]) -> BuildReport {
    let project = self.project();
    let sources: Vec<PathBuf> = sources.iter().map(PathBuf::from).collect();
    let mut engine = open_engine(&project).unwrap();
    engine.build(&artifact_targets(&project, &sources)).unwrap()
  }

  /// Build and require success.
  pub fn build_ok(&self, sources: &[&str]) -> BuildReport {
    let report = self.build(sources);
    assert!(report.is_success(), "build failed: {:?}", report.failed);
    report
  }

  pub fn direct(&self, source: &str) -> Vec<String> {
    self.load(ArtifactKind::Direct, source)
  }

  pub fn transitive(&self, source: &str) -> Vec<String> {
    self.load(ArtifactKind::Transitive, source)
  }

  pub fn artifact_path(&self, kind: ArtifactKind, source: &str) -> PathBuf {
    kind.artifact_path(&self.project().output_root(), Path::new(source))
  }

  pub fn mtime(&self, kind: ArtifactKind, source: &str) -> SystemTime {
    std::fs::metadata(self.artifact_path(kind, source))
      .unwrap()
      .modified()
      .unwrap()
  }

  fn load(&self, kind: ArtifactKind, source: &str) -> Vec<String> {
    query::load(kind, &self.project().output_root(), Path::new(source))
      .unwrap()
      .into_iter()
      .map(|p| p.to_string_lossy().replace('\\', "/"))
      .collect()
  }
}
