//! Get species command implementation.

use anyhow::{Context, Result};
use clap::Args;

use taxon_core::{DocumentId, LanguageCode};

use crate::output;
use crate::store::StoreLocation;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Species id
    pub id: DocumentId,

    /// Two-letter language code
    #[arg(long, default_value = "en")]
    pub lang: LanguageCode,

    /// User id for observation status
    #[arg(long)]
    pub uid: Option<String>,
}

pub async fn run(args: GetArgs, location: &StoreLocation) -> Result<()> {
    let catalog = location.catalog()?;

    let detail = catalog
        .species_detail(&args.id, &args.lang, args.uid.as_deref())
        .await
        .context("Failed to get species")?;

    match detail {
        Some(detail) => output::json_pretty(&detail),
        None => {
            output::notice(&format!("Species {} not found.", args.id));
            Ok(())
        }
    }
}
