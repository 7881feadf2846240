//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::species::SpeciesCommand;

/// Species catalog CLI.
#[derive(Parser, Debug)]
#[command(name = "taxon")]
#[command(author, version = env!("TAXON_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Store directory (defaults to the user data directory)
    #[arg(long, env = "TAXON_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Catalog configuration file (JSON)
    #[arg(long, env = "TAXON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Species catalog operations
    Species(SpeciesCommand),
}
