//! Per-user observation lookup.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use taxon_core::{DocumentId, DocumentStore, FieldFilter, Query};

use crate::config::ObservationFields;

/// Whether a user has observed a species, and when first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationStatus {
    pub have_observation: bool,
    pub first_found: Option<DateTime<Utc>>,
}

/// Look up the user's earliest observation of a species.
///
/// Every observation of the pair is read and the earliest parsed timestamp
/// wins. Observations without a readable timestamp still count as observed.
/// Store failures degrade to "not observed" instead of failing the page.
pub(crate) async fn first_observation<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
    fields: &ObservationFields,
    uid: &str,
    species_id: &DocumentId,
) -> ObservationStatus {
    let query = Query::collection(collection)
        .filter(FieldFilter::eq(fields.user_id.as_str(), uid))
        .filter(FieldFilter::eq(fields.species_id.as_str(), species_id.as_str()));

    match store.query(&query).await {
        Ok(docs) if docs.is_empty() => ObservationStatus::default(),
        Ok(docs) => ObservationStatus {
            have_observation: true,
            first_found: docs
                .iter()
                .filter_map(|doc| doc.get_path(&fields.found_at))
                .filter_map(parse_timestamp)
                .min(),
        },
        Err(err) => {
            warn!(error = %err, species = %species_id, "Observation lookup failed");
            ObservationStatus::default()
        }
    }
}

/// Accepts RFC 3339 strings and integer milliseconds since the epoch.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }
}
