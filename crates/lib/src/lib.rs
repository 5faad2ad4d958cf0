//! depcache-lib: import dependency caching for incremental builds
//!
//! For every source file this crate maintains two artifacts: the files it
//! imports directly, and the full closure of files it depends on. They are
//! produced by rules on a small incremental engine, so they are recomputed
//! only when a file they were derived from changes, and rewritten only when
//! their content changes.
//!
//! - [`extract`]: language-specific import scanning
//! - [`resolve`]: search-root lookup
//! - [`imports`]: direct-import resolution
//! - [`deps`]: artifact rules and registration
//! - [`query`]: reading artifacts from other rules
//! - [`engine`]: the incremental engine itself
//! - [`gc`]: removing artifacts of deleted sources

pub mod config;
pub mod consts;
pub mod deps;
pub mod engine;
pub mod extract;
pub mod gc;
pub mod imports;
pub mod query;
pub mod resolve;
pub mod util;
