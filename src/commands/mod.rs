//! Handlers for the command line flags, e.g. `--sections`.
pub mod info;
pub mod tables;

pub use info::*;
