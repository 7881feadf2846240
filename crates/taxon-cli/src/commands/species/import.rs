//! Import command implementation.

use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;
use tracing::debug;

use taxon_core::DocumentId;

use crate::output;
use crate::store::StoreLocation;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Collection to write into
    #[arg(long)]
    pub collection: String,

    /// JSON file holding an array of documents (use - for stdin)
    pub file: String,
}

pub async fn run(args: ImportArgs, location: &StoreLocation) -> Result<()> {
    let content = if args.file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.file).context("Failed to read JSON file")?
    };

    let documents: Vec<Value> = serde_json::from_str(&content).context("Expected a JSON array")?;
    let store = location.file_store();
    let total = documents.len();

    for (index, value) in documents.into_iter().enumerate() {
        let Value::Object(mut fields) = value else {
            bail!("Document {} is not a JSON object", index);
        };

        let id = match fields.remove("id") {
            Some(Value::String(id)) => {
                Some(DocumentId::new(&id).with_context(|| format!("Invalid id '{}'", id))?)
            }
            Some(other) => bail!("Document {} has a non-string id: {}", index, other),
            None => None,
        };

        let id = store
            .put(&args.collection, id, fields)
            .await
            .with_context(|| format!("Failed to store document {}", index))?;
        debug!(collection = %args.collection, id = %id, "Imported document");
    }

    output::success(&format!(
        "Imported {} documents into {}",
        total, args.collection
    ));

    Ok(())
}
