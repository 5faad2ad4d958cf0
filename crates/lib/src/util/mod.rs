//! Shared utilities.
//!
//! Content hashing and filesystem helpers used by the engine and the
//! dependency rules.

pub mod fs;
pub mod hash;
