use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn deps_prints_direct_imports() {
  let env = TestEnv::sample();

  env
    .cmd()
    .args(["deps", "Main.hs"])
    .assert()
    .success()
    .stdout("Lib/Util.hs\n");
}

#[test]
fn deps_transitive_builds_on_demand() {
  let env = TestEnv::sample();

  env
    .cmd()
    .args(["deps", "Main.hs", "--transitive"])
    .assert()
    .success()
    .stdout("Lib/Util.hs\nLib/Types.hs\n");

  assert!(env.output_root().join("Lib/Types.hs.transitiveImports").exists());
}

#[test]
fn deps_follows_source_edits() {
  let env = TestEnv::sample();
  env.cmd().args(["deps", "Main.hs", "--transitive"]).assert().success();

  env.write_file("Lib/Types.hs", "module Lib.Types where\nimport Lib.Extra\n");
  env.write_file("Lib/Extra.hs", "module Lib.Extra where\n");

  env
    .cmd()
    .args(["deps", "Main.hs", "--transitive"])
    .assert()
    .success()
    .stdout("Lib/Util.hs\nLib/Types.hs\nLib/Extra.hs\n");
}

#[test]
fn deps_json_output() {
  let env = TestEnv::sample();

  let output = env.cmd().args(["deps", "main.c", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["kind"], "direct");
  assert_eq!(json["file"], "main.c");
  assert_eq!(json["imports"], serde_json::json!(["api.h"]));
}

#[test]
fn deps_of_missing_file_fails() {
  let env = TestEnv::sample();

  env
    .cmd()
    .args(["deps", "Missing.hs"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to read source"));
}

#[test]
fn cyclic_imports_are_reported_not_fatal() {
  let env = TestEnv::empty();
  env.write_file("A.hs", "import B\n");
  env.write_file("B.hs", "import A\n");

  env
    .cmd()
    .args(["deps", "A.hs", "--transitive"])
    .assert()
    .success()
    .stdout("B.hs\n")
    .stderr(predicate::str::contains("import cycle"));
}
