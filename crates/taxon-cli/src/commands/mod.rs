//! Subcommand implementations.

pub mod species;
