//! Species subcommand implementations.

mod by_ids;
mod classes;
mod get;
mod import;
mod list;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::store::StoreLocation;

#[derive(Args, Debug)]
pub struct SpeciesCommand {
    #[command(subcommand)]
    pub command: SpeciesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SpeciesSubcommand {
    /// List one page of species
    List(list::ListArgs),

    /// Fetch a single species with its full description
    Get(get::GetArgs),

    /// Fetch species by a comma separated id list
    ByIds(by_ids::ByIdsArgs),

    /// List the species classes
    Classes(classes::ClassesArgs),

    /// Load a JSON array of documents into a collection
    Import(import::ImportArgs),
}

pub async fn handle(cmd: SpeciesCommand, location: &StoreLocation) -> Result<()> {
    match cmd.command {
        SpeciesSubcommand::List(args) => list::run(args, location).await,
        SpeciesSubcommand::Get(args) => get::run(args, location).await,
        SpeciesSubcommand::ByIds(args) => by_ids::run(args, location).await,
        SpeciesSubcommand::Classes(args) => classes::run(args, location).await,
        SpeciesSubcommand::Import(args) => import::run(args, location).await,
    }
}
