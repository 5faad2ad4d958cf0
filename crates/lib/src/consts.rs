pub const APP_NAME: &str = "depcache";

/// Project configuration file, looked up at the project root.
pub const CONFIG_FILE: &str = "depcache.json";

/// Environment variable that replaces the configured output directory.
pub const OUTPUT_DIR_ENV: &str = "DEPCACHE_OUTPUT_DIR";

/// Trace database file name, stored directly under the output root.
pub const TRACE_DB_FILE: &str = ".depcache-traces.json";

pub const DIRECT_IMPORTS_SUFFIX: &str = ".directImports";
pub const TRANSITIVE_IMPORTS_SUFFIX: &str = ".transitiveImports";

pub const DEFAULT_OUTPUT_DIR: &str = "_build/deps";
pub const DEFAULT_MODULE_EXTENSION: &str = "hs";
pub const DEFAULT_MODULE_KEYWORD: &str = "import";
pub const DEFAULT_NATIVE_EXTENSIONS: &[&str] = &["c", "h"];
pub const DEFAULT_INCLUDE_KEYWORD: &str = "#include";
