//! Subcommand implementations

pub mod sync;
pub mod validate;
