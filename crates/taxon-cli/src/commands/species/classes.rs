//! List classes command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::store::StoreLocation;

#[derive(Args, Debug)]
pub struct ClassesArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ClassesArgs, location: &StoreLocation) -> Result<()> {
    let catalog = location.catalog()?;

    let classes = catalog
        .list_classes()
        .await
        .context("Failed to list classes")?;

    if classes.is_empty() {
        output::notice("No classes found.");
        return Ok(());
    }

    for class in &classes {
        output::print(class, args.pretty)?;
    }

    Ok(())
}
