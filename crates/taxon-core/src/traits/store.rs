//! Document store trait.

use async_trait::async_trait;

use crate::document::Document;
use crate::query::Query;
use crate::types::DocumentId;
use crate::Result;

/// A document store the catalog reads from.
///
/// Implementations answer [`Query`] values with the semantics of
/// [`Query::evaluate`]. Transport failures surface as
/// [`Error::StoreUnavailable`](crate::Error::StoreUnavailable); callers do
/// not retry them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document, or `None` if the id does not resolve.
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>>;

    /// Fetch the documents for up to
    /// [`MAX_IDS_PER_LOOKUP`](crate::query::MAX_IDS_PER_LOOKUP) ids.
    ///
    /// Unknown ids are skipped. The result order is unspecified.
    async fn get_many(&self, collection: &str, ids: &[DocumentId]) -> Result<Vec<Document>>;

    /// Run a query and return matching documents in sort order.
    async fn query(&self, query: &Query) -> Result<Vec<Document>>;

    /// Count the documents matching a query's filters.
    async fn count(&self, query: &Query) -> Result<u64>;
}
