//! Subcommand implementations.

pub mod record;
pub mod sync;
