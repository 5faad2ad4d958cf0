mod closure_tests;
mod common;
