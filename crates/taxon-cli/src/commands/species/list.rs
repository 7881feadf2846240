//! List species command implementation.

use anyhow::{Context, Result};
use clap::Args;

use taxon::PageRequest;
use taxon_core::{DocumentId, LanguageCode};

use crate::output;
use crate::store::StoreLocation;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Records per page (defaults to the configured page size)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub page_size: Option<u32>,

    /// Free-text search over names and scientific names
    #[arg(long)]
    pub search: Option<String>,

    /// Class id to filter by ("0" for all classes)
    #[arg(long = "class")]
    pub class_id: Option<String>,

    /// Two-letter language code
    #[arg(long, default_value = "en")]
    pub lang: LanguageCode,

    /// Id of the last record on the previous page
    #[arg(long)]
    pub cursor: Option<DocumentId>,

    /// User id for observation status
    #[arg(long)]
    pub uid: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs, location: &StoreLocation) -> Result<()> {
    let catalog = location.catalog()?;

    let request = PageRequest {
        page: args.page,
        page_size: args
            .page_size
            .unwrap_or(location.config.default_page_size),
        search_query: args.search,
        class_id: args.class_id,
        language: args.lang,
        cursor: args.cursor,
        uid: args.uid,
    };

    let result = catalog
        .list_species(&request)
        .await
        .context("Failed to list species")?;

    output::print(&result, args.pretty)
}
