mod build_tests;
mod common;
mod deps_tests;
mod gc_tests;
