//! Project configuration.
//!
//! Everything the dependency rules need (search roots, output location,
//! language keywords) is carried in a [`Project`] value and passed down
//! explicitly. Nothing here is global.
//!
//! Configuration comes from an optional `depcache.json` at the project root.
//! Every field is optional; `DEPCACHE_OUTPUT_DIR` overrides `output_dir`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_FILE, DEFAULT_INCLUDE_KEYWORD, DEFAULT_MODULE_EXTENSION, DEFAULT_MODULE_KEYWORD, DEFAULT_NATIVE_EXTENSIONS,
  DEFAULT_OUTPUT_DIR, OUTPUT_DIR_ENV, TRACE_DB_FILE,
};
use crate::util::fs::normalize_path;

/// Errors that can occur while loading a project.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to canonicalize project root {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: std::io::Error },

  #[error("failed to read config file {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse config file {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

/// Settings read from `depcache.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// Artifact directory, relative to the project root unless absolute
  pub output_dir: PathBuf,
  /// Search roots for module-style imports, in priority order
  pub module_roots: Vec<PathBuf>,
  /// Search roots for quoted includes, in priority order
  pub include_roots: Vec<PathBuf>,
  /// Extension of module-style sources, without the dot
  pub module_extension: String,
  /// Keyword that starts a module import line
  pub module_keyword: String,
  /// Extensions of quoted-include sources
  pub native_extensions: Vec<String>,
  /// Keyword that starts an include line
  pub include_keyword: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
      module_roots: vec![PathBuf::from(".")],
      include_roots: vec![PathBuf::from(".")],
      module_extension: DEFAULT_MODULE_EXTENSION.to_string(),
      module_keyword: DEFAULT_MODULE_KEYWORD.to_string(),
      native_extensions: DEFAULT_NATIVE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
      include_keyword: DEFAULT_INCLUDE_KEYWORD.to_string(),
    }
  }
}

impl Config {
  /// Parse a config file.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Apply environment overrides.
  pub fn apply_env(&mut self) {
    if let Some(dir) = std::env::var(OUTPUT_DIR_ENV).ok().filter(|d| !d.is_empty()) {
      debug!(output_dir = %dir, "output directory overridden from environment");
      self.output_dir = PathBuf::from(dir);
    }
  }
}

/// A project root plus its configuration.
#[derive(Debug, Clone)]
pub struct Project {
  root: PathBuf,
  config: Config,
}

impl Project {
  /// Load the project rooted at `root`.
  ///
  /// Reads `depcache.json` when present, falls back to defaults otherwise,
  /// then applies environment overrides.
  pub fn load(root: &Path) -> Result<Self, ConfigError> {
    let root = canonicalize(root)?;
    let config_path = root.join(CONFIG_FILE);

    let mut config = if config_path.is_file() {
      debug!(path = %config_path.display(), "loading config");
      Config::from_file(&config_path)?
    } else {
      Config::default()
    };
    config.apply_env();

    Ok(Self { root, config })
  }

  /// Build a project from an explicit config, without reading files or the environment.
  pub fn new(root: &Path, config: Config) -> Result<Self, ConfigError> {
    Ok(Self {
      root: canonicalize(root)?,
      config,
    })
  }

  /// Canonical project root. Artifact entries are relative to it.
  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Directory that holds every artifact.
  pub fn output_root(&self) -> PathBuf {
    normalize_path(&self.root.join(&self.config.output_dir))
  }

  pub fn module_roots(&self) -> Vec<PathBuf> {
    self.absolute(&self.config.module_roots)
  }

  pub fn include_roots(&self) -> Vec<PathBuf> {
    self.absolute(&self.config.include_roots)
  }

  pub fn trace_db_path(&self) -> PathBuf {
    self.output_root().join(TRACE_DB_FILE)
  }

  fn absolute(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
    roots.iter().map(|r| normalize_path(&self.root.join(r))).collect()
  }
}

fn canonicalize(root: &Path) -> Result<PathBuf, ConfigError> {
  dunce::canonicalize(root).map_err(|source| ConfigError::Canonicalize {
    path: root.to_path_buf(),
    source,
  })
}
