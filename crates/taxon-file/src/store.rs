//! Filesystem storage for documents.
//!
//! ## Directory Structure
//!
//! ```text
//! $ROOT/
//! └── collections/
//!     └── <collection>/
//!         └── <id>.json
//! ```
//!
//! Each file holds the document's top-level fields as a JSON object.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use taxon_core::error::{Error, InvalidInputError, StoreError};
use taxon_core::query::MAX_IDS_PER_LOOKUP;
use taxon_core::{Document, DocumentId, DocumentStore, Query, Result};

fn corrupt(id: &str, message: impl ToString) -> Error {
    Error::StoreUnavailable(StoreError::Corrupt {
        id: id.to_string(),
        message: message.to_string(),
    })
}

/// Filesystem-backed document store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the collections directory.
    fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    /// Get the directory for one collection.
    fn collection_dir(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection != "."
            && collection != ".."
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

        if !valid {
            return Err(InvalidInputError::Other {
                message: format!("invalid collection name '{}'", collection),
            }
            .into());
        }

        Ok(self.collections_dir().join(collection))
    }

    /// Get the path for a specific document.
    fn document_path(&self, collection: &str, id: &DocumentId) -> Result<PathBuf> {
        Ok(self
            .collection_dir(collection)?
            .join(format!("{}.json", id.as_str())))
    }

    /// Fail unless the store root exists.
    async fn ensure_root(&self) -> Result<()> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(StoreError::Connection {
                message: format!("store root {} is not a directory", self.root.display()),
            }
            .into()),
        }
    }

    /// Generate a new document id.
    fn generate_id() -> Result<DocumentId> {
        let raw = Uuid::new_v4().simple().to_string();
        DocumentId::new(&raw[..20])
    }

    async fn read_document(&self, path: &Path, id: DocumentId) -> Result<Document> {
        let content = fs::read_to_string(path).await?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| corrupt(id.as_str(), e))?;

        match value {
            Value::Object(fields) => Ok(Document::new(id, fields)),
            _ => Err(corrupt(id.as_str(), "document is not a JSON object")),
        }
    }

    /// Load every document in a collection.
    async fn load_collection(&self, collection: &str) -> Result<Vec<Document>> {
        self.ensure_root().await?;
        let dir = self.collection_dir(collection)?;

        if fs::metadata(&dir).await.is_err() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let id = match DocumentId::new(stem) {
                Ok(id) => id,
                Err(_) => {
                    trace!(path = %path.display(), "Skipping file with invalid id");
                    continue;
                }
            };

            docs.push(self.read_document(&path, id).await?);
        }

        Ok(docs)
    }

    // ========================================================================
    // Write Operations
    // ========================================================================

    /// Write a document, assigning a fresh id when none is given.
    #[instrument(skip(self, fields))]
    pub async fn put(
        &self,
        collection: &str,
        id: Option<DocumentId>,
        fields: Map<String, Value>,
    ) -> Result<DocumentId> {
        let id = match id {
            Some(id) => id,
            None => Self::generate_id()?,
        };
        let path = self.document_path(collection, &id)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(fields)).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &path).await?;

        debug!(collection, id = %id, "Stored document");

        Ok(id)
    }

    /// Delete a document. Returns false if it did not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool> {
        let path = self.document_path(collection, id)?;

        if fs::metadata(&path).await.is_err() {
            return Ok(false);
        }

        fs::remove_file(&path).await?;
        debug!(collection, id = %id, "Deleted document");

        Ok(true)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        self.ensure_root().await?;
        let path = self.document_path(collection, id)?;

        if fs::metadata(&path).await.is_err() {
            return Ok(None);
        }

        self.read_document(&path, id.clone()).await.map(Some)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, collection: &str, ids: &[DocumentId]) -> Result<Vec<Document>> {
        if ids.len() > MAX_IDS_PER_LOOKUP {
            return Err(InvalidInputError::Query {
                reason: format!(
                    "{} ids requested, limit is {}",
                    ids.len(),
                    MAX_IDS_PER_LOOKUP
                ),
            }
            .into());
        }

        let mut docs: Vec<Document> = Vec::with_capacity(ids.len());
        for id in ids {
            if docs.iter().any(|d| &d.id == id) {
                continue;
            }
            if let Some(doc) = self.get(collection, id).await? {
                docs.push(doc);
            }
        }

        Ok(docs)
    }

    #[instrument(skip(self, query), fields(collection = %query.collection))]
    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        let docs = self.load_collection(&query.collection).await?;
        let result = query.evaluate(docs)?;
        debug!(returned = result.len(), "Query answered");
        Ok(result)
    }

    #[instrument(skip(self, query), fields(collection = %query.collection))]
    async fn count(&self, query: &Query) -> Result<u64> {
        let docs = self.load_collection(&query.collection).await?;
        query.count(&docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taxon_core::FieldFilter;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileStore) {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        (tmp, store)
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (_tmp, store) = create_test_store();

        let id = DocumentId::new("redfox").unwrap();
        store
            .put("species", Some(id.clone()), fields(json!({ "classId": "mammalia" })))
            .await
            .unwrap();

        let doc = store.get("species", &id).await.unwrap().unwrap();
        assert_eq!(doc.get("classId").unwrap(), "mammalia");
    }

    #[tokio::test]
    async fn test_put_assigns_id() {
        let (_tmp, store) = create_test_store();

        let id = store
            .put("species", None, fields(json!({ "classId": "aves" })))
            .await
            .unwrap();

        assert_eq!(id.as_str().len(), 20);
        assert!(store.get("species", &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (_tmp, store) = create_test_store();

        let id = DocumentId::new("nothing").unwrap();
        assert!(store.get("species", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_root_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("absent"));

        let err = store
            .query(&Query::collection("species"))
            .await
            .unwrap_err();
        assert!(err.is_store_unavailable());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_unavailable() {
        let (tmp, store) = create_test_store();

        let dir = tmp.path().join("collections/species");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.json"), "not json").unwrap();

        let err = store
            .query(&Query::collection("species"))
            .await
            .unwrap_err();
        assert!(err.is_store_unavailable());
    }

    #[tokio::test]
    async fn test_query_filters_and_orders() {
        let (_tmp, store) = create_test_store();

        for (id, name, class) in [
            ("c", "Wolf", "mammalia"),
            ("a", "Heron", "aves"),
            ("b", "Badger", "mammalia"),
        ] {
            store
                .put(
                    "species",
                    Some(DocumentId::new(id).unwrap()),
                    fields(json!({ "name": { "en": name }, "classId": class })),
                )
                .await
                .unwrap();
        }

        let query = Query::collection("species")
            .filter(FieldFilter::eq("classId", "mammalia"))
            .order_by("name.en");

        let docs = store.query(&query).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);

        assert_eq!(store.count(&query.limit(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_many_skips_unknown() {
        let (_tmp, store) = create_test_store();

        let known = store
            .put("species", None, fields(json!({})))
            .await
            .unwrap();
        let unknown = DocumentId::new("ghost").unwrap();

        let docs = store
            .get_many("species", &[unknown, known.clone(), known.clone()])
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, known);
    }

    #[tokio::test]
    async fn test_get_many_rejects_oversized_lookup() {
        let (_tmp, store) = create_test_store();

        let ids: Vec<_> = (0..31)
            .map(|i| DocumentId::new(format!("id{}", i)).unwrap())
            .collect();
        assert!(store.get_many("species", &ids).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_tmp, store) = create_test_store();

        let id = store
            .put("species", None, fields(json!({})))
            .await
            .unwrap();

        assert!(store.delete("species", &id).await.unwrap());
        assert!(!store.delete("species", &id).await.unwrap());
        assert!(store.get("species", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_bad_collection_name() {
        let (_tmp, store) = create_test_store();

        assert!(store.query(&Query::collection("../etc")).await.is_err());
    }
}
