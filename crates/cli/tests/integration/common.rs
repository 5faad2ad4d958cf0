//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated project directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// A small mixed project: `Main.hs -> Lib/Util.hs -> Lib/Types.hs` and
  /// `main.c -> api.h`.
  pub fn sample() -> Self {
    let env = Self::empty();
    env.write_file("Main.hs", "module Main where\nimport Lib.Util\nimport Data.List\n");
    env.write_file("Lib/Util.hs", "module Lib.Util where\nimport Lib.Types\n");
    env.write_file("Lib/Types.hs", "module Lib.Types where\n");
    env.write_file("main.c", "#include \"api.h\"\n#include <stdio.h>\n");
    env.write_file("api.h", "");
    env
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn remove_file(&self, relative_path: &str) {
    std::fs::remove_file(self.temp.path().join(relative_path)).unwrap();
  }

  /// Canonical project root.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Default artifact directory.
  pub fn output_root(&self) -> PathBuf {
    self.root().join("_build").join("deps")
  }

  pub fn read_artifact(&self, name: &str) -> String {
    std::fs::read_to_string(self.output_root().join(name)).unwrap()
  }

  /// A command for the depcache binary, rooted at this project.
  ///
  /// `DEPCACHE_OUTPUT_DIR` is cleared so the default layout applies.
  pub fn cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("depcache");
    cmd.arg("-C").arg(self.temp.path());
    cmd.env_remove("DEPCACHE_OUTPUT_DIR");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
