//! Species by id list command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use taxon_core::query::MAX_IDS_PER_LOOKUP;
use taxon_core::{DocumentId, LanguageCode};

use crate::output;
use crate::store::StoreLocation;

#[derive(Args, Debug)]
pub struct ByIdsArgs {
    /// Comma separated species ids (at most 30)
    pub ids: String,

    /// Two-letter language code
    #[arg(long, default_value = "en")]
    pub lang: LanguageCode,

    /// User id for observation status
    #[arg(long)]
    pub uid: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ByIdsArgs, location: &StoreLocation) -> Result<()> {
    let ids = parse_id_list(&args.ids)?;
    let catalog = location.catalog()?;

    let result = catalog
        .species_by_ids(&ids, &args.lang, args.uid.as_deref())
        .await
        .context("Failed to fetch species")?;

    output::print(&result, args.pretty)
}

/// Parse `a,b,c` into ids. Each id must be alphanumeric.
fn parse_id_list(raw: &str) -> Result<Vec<DocumentId>> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();

    if parts.iter().all(|p| p.is_empty()) {
        bail!("At least one id is required");
    }
    if parts.len() > MAX_IDS_PER_LOOKUP {
        bail!(
            "At most {} ids may be requested, got {}",
            MAX_IDS_PER_LOOKUP,
            parts.len()
        );
    }

    parts
        .into_iter()
        .map(|part| {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                bail!("Invalid id '{}': ids must be alphanumeric", part);
            }
            DocumentId::new(part).with_context(|| format!("Invalid id '{}'", part))
        })
        .collect()
}
