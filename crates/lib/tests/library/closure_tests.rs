use std::path::PathBuf;

use depcache_lib::config::Config;
use depcache_lib::deps::ArtifactKind;

use super::common::Fixture;

#[test]
fn chain_closure() {
  let fx = Fixture::new();
  fx.write("X.hs", "module X where\nimport Y\n");
  fx.write("Y.hs", "module Y where\nimport Z\n");
  fx.write("Z.hs", "module Z where\n");

  fx.build_ok(&["X.hs"]);

  assert_eq!(fx.transitive("X.hs"), vec!["Y.hs", "Z.hs"]);
  assert_eq!(fx.transitive("Y.hs"), vec!["Z.hs"]);
  assert!(fx.transitive("Z.hs").is_empty());
}

#[test]
fn unresolved_module_is_dropped() {
  let fx = Fixture::new();
  fx.write("Main.hs", "import Foo.Bar\nimport Baz\n");
  fx.write("Foo/Bar.hs", "");

  fx.build_ok(&["Main.hs"]);

  assert_eq!(fx.direct("Main.hs"), vec!["Foo/Bar.hs"]);
  assert_eq!(
    std::fs::read_to_string(fx.artifact_path(ArtifactKind::Direct, "Main.hs")).unwrap(),
    "Foo/Bar.hs\n"
  );
}

#[test]
fn angle_includes_are_ignored() {
  let fx = Fixture::new();
  fx.write("main.c", "#include \"a.h\"\n#include <b.h>\n");
  fx.write("a.h", "");
  fx.write("b.h", "");

  fx.build_ok(&["main.c"]);

  assert_eq!(fx.direct("main.c"), vec!["a.h"]);
}

#[test]
fn headers_chain_through_includes() {
  let fx = Fixture::new();
  fx.write("src/main.c", "#include \"api.h\"\nint main(void) { return 0; }\n");
  fx.write("src/api.h", "#include \"types.h\"\n");
  fx.write("src/types.h", "#include <stdint.h>\n");
  let config = Config {
    include_roots: vec![PathBuf::from("src")],
    ..Config::default()
  };
  let fx = Fixture { config, ..fx };

  fx.build_ok(&["src/main.c"]);

  assert_eq!(fx.direct("src/main.c"), vec!["src/api.h"]);
  assert_eq!(fx.transitive("src/main.c"), vec!["src/api.h", "src/types.h"]);
  assert!(fx.transitive("src/types.h").is_empty());
}

#[test]
fn diamond_is_deduplicated() {
  let fx = Fixture::new();
  fx.write("A.hs", "import B\nimport C\n");
  fx.write("B.hs", "import D\n");
  fx.write("C.hs", "import D\n");
  fx.write("D.hs", "");

  fx.build_ok(&["A.hs"]);

  assert_eq!(fx.transitive("A.hs"), vec!["B.hs", "C.hs", "D.hs"]);
}

#[test]
fn transitive_contains_every_direct_import() {
  let fx = Fixture::new();
  fx.write("A.hs", "import C\nimport B\nimport C\n");
  fx.write("B.hs", "import C\n");
  fx.write("C.hs", "");

  fx.build_ok(&["A.hs"]);

  let direct = fx.direct("A.hs");
  let transitive = fx.transitive("A.hs");
  assert_eq!(direct, vec!["C.hs", "B.hs", "C.hs"]);
  assert_eq!(transitive, vec!["C.hs", "B.hs"]);
  assert!(direct.iter().all(|d| transitive.contains(d)));
}

#[test]
fn first_search_root_wins() {
  let fx = Fixture::with_config(Config {
    module_roots: vec![PathBuf::from("src"), PathBuf::from("vendor")],
    ..Config::default()
  });
  fx.write("src/App.hs", "import Util\nimport Extra\n");
  fx.write("src/Util.hs", "");
  fx.write("vendor/Util.hs", "");
  fx.write("vendor/Extra.hs", "");

  fx.build_ok(&["src/App.hs"]);

  assert_eq!(fx.direct("src/App.hs"), vec!["src/Util.hs", "vendor/Extra.hs"]);
}

#[test]
fn two_file_cycle_is_truncated() {
  let fx = Fixture::new();
  fx.write("A.hs", "import B\n");
  fx.write("B.hs", "import A\n");

  fx.build_ok(&["A.hs", "B.hs"]);

  assert_eq!(fx.transitive("A.hs"), vec!["B.hs"]);
  assert_eq!(fx.transitive("B.hs"), vec!["A.hs"]);
}

#[test]
fn longer_cycle_never_lists_self() {
  let fx = Fixture::new();
  fx.write("A.hs", "import B\n");
  fx.write("B.hs", "import C\n");
  fx.write("C.hs", "import A\n");

  fx.build_ok(&["A.hs"]);

  assert_eq!(fx.transitive("A.hs"), vec!["B.hs", "C.hs"]);
  assert_eq!(fx.transitive("B.hs"), vec!["C.hs", "A.hs"]);
  assert_eq!(fx.transitive("C.hs"), vec!["A.hs", "B.hs"]);
}

#[test]
fn self_import_is_direct_only() {
  let fx = Fixture::new();
  fx.write("Loop.hs", "import Loop\n");

  fx.build_ok(&["Loop.hs"]);

  assert_eq!(fx.direct("Loop.hs"), vec!["Loop.hs"]);
  assert!(fx.transitive("Loop.hs").is_empty());
}

#[test]
fn missing_source_fails_its_artifacts() {
  let fx = Fixture::new();

  let report = fx.build(&["Gone.hs"]);

  assert!(!report.is_success());
  assert_eq!(report.failed.len(), 2);
  let direct = fx.artifact_path(ArtifactKind::Direct, "Gone.hs");
  let message = report.failure(&direct).unwrap().to_string();
  assert!(message.contains("failed to read source"), "{}", message);
}

#[test]
fn other_sources_build_despite_failure() {
  let fx = Fixture::new();
  fx.write("Ok.hs", "");

  let report = fx.build(&["Gone.hs", "Ok.hs"]);

  assert_eq!(report.failed.len(), 2);
  assert!(fx.artifact_path(ArtifactKind::Transitive, "Ok.hs").exists());
}
