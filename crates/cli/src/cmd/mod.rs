mod build;
mod deps;
mod gc;
mod status;

pub use build::cmd_build;
pub use deps::cmd_deps;
pub use gc::cmd_gc;
pub use status::cmd_status;
