use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn build_discovers_all_sources() {
  let env = TestEnv::sample();

  env
    .cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Dependencies up to date (5 sources)"));

  assert_eq!(env.read_artifact("Main.hs.directImports"), "Lib/Util.hs\n");
  assert_eq!(env.read_artifact("Main.hs.transitiveImports"), "Lib/Util.hs\nLib/Types.hs\n");
  assert_eq!(env.read_artifact("main.c.directImports"), "api.h\n");
  assert_eq!(env.read_artifact("api.h.transitiveImports"), "");
}

#[test]
fn second_build_rebuilds_nothing() {
  let env = TestEnv::sample();
  env.cmd().arg("build").assert().success();

  let output = env.cmd().args(["build", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["stats"]["rebuilt"], 0);
  assert_eq!(json["stats"]["clean"], 10);
  assert_eq!(json["failed"].as_array().unwrap().len(), 0);
}

#[test]
fn build_json_reports_dependencies_first_order() {
  let env = TestEnv::sample();

  let output = env.cmd().args(["build", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let order = json["build_order"].as_array().unwrap();
  assert_eq!(order.len(), 10);

  let pos = |target: &str| {
    order
      .iter()
      .position(|entry| entry["target"] == target)
      .unwrap_or_else(|| panic!("{} missing from build order", target))
  };
  let main = "_build/deps/Main.hs.transitiveImports";
  assert!(pos("_build/deps/Lib/Types.hs.transitiveImports") < pos("_build/deps/Lib/Util.hs.transitiveImports"));
  assert!(pos("_build/deps/Lib/Util.hs.transitiveImports") < pos(main));
  assert!(pos("_build/deps/Main.hs.directImports") < pos(main));

  assert_eq!(
    order[pos(main)]["needs"],
    serde_json::json!([
      "_build/deps/Lib/Util.hs.transitiveImports",
      "_build/deps/Main.hs.directImports"
    ])
  );
}

#[test]
fn build_selected_files_only() {
  let env = TestEnv::sample();

  env.cmd().args(["build", "main.c"]).assert().success();

  assert_eq!(env.read_artifact("main.c.transitiveImports"), "api.h\n");
  assert!(!env.output_root().join("Main.hs.directImports").exists());
}

#[test]
fn missing_source_fails_build() {
  let env = TestEnv::sample();

  env
    .cmd()
    .args(["build", "Nope.hs"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to read source"))
    .stderr(predicate::str::contains("2 targets failed"));
}

#[test]
fn source_outside_root_is_rejected() {
  let env = TestEnv::sample();

  env
    .cmd()
    .args(["build", "../elsewhere.c"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid source path"));
}

#[test]
fn output_dir_env_override() {
  let env = TestEnv::sample();

  env
    .cmd()
    .env("DEPCACHE_OUTPUT_DIR", "cache")
    .args(["build", "main.c"])
    .assert()
    .success();

  assert!(env.root().join("cache").join("main.c.directImports").exists());
  assert!(!env.output_root().exists());
}

#[test]
fn config_file_changes_search_roots() {
  let env = TestEnv::empty();
  env.write_file("depcache.json", r#"{ "include_roots": ["include"] }"#);
  env.write_file("src/main.c", "#include \"lib.h\"\n");
  env.write_file("include/lib.h", "");

  env.cmd().args(["build", "src/main.c"]).assert().success();

  assert_eq!(env.read_artifact("src/main.c.directImports"), "include/lib.h\n");
}

#[test]
fn malformed_config_is_fatal() {
  let env = TestEnv::empty();
  env.write_file("depcache.json", "{ nope");

  env
    .cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load project"));
}

#[test]
fn verbose_logs_rebuilds() {
  let env = TestEnv::sample();

  env
    .cmd()
    .args(["-v", "build", "main.c"])
    .assert()
    .success()
    .stderr(predicate::str::contains("building"));
}
