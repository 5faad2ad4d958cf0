use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn gc_with_no_artifacts_succeeds() {
  let env = TestEnv::empty();

  env
    .cmd()
    .arg("gc")
    .assert()
    .success()
    .stdout(predicate::str::contains("Garbage collection complete"));
}

#[test]
fn gc_removes_artifacts_of_deleted_sources() {
  let env = TestEnv::sample();
  env.cmd().arg("build").assert().success();
  env.remove_file("main.c");

  env
    .cmd()
    .arg("gc")
    .assert()
    .success()
    .stdout(predicate::str::contains("Artifacts removed: 2"));

  assert!(!env.output_root().join("main.c.directImports").exists());
  assert!(env.output_root().join("api.h.directImports").exists());
}

#[test]
fn gc_dry_run_keeps_files() {
  let env = TestEnv::sample();
  env.cmd().arg("build").assert().success();
  env.remove_file("api.h");

  env
    .cmd()
    .args(["gc", "--dry-run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Dry run"))
    .stdout(predicate::str::contains("api.h.directImports"));

  assert!(env.output_root().join("api.h.directImports").exists());
}

#[test]
fn gc_json_output_is_valid() {
  let env = TestEnv::empty();

  env
    .cmd()
    .args(["gc", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("artifacts_deleted"))
    .stdout(predicate::str::contains("traces_removed"))
    .stdout(predicate::str::contains("deleted_paths"));
}
