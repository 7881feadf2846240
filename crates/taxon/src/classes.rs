//! Species classes and the class name cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use taxon_core::{Clock, Document, DocumentStore, LanguageCode, Query, Result};

use crate::localize;

/// A row of the class side table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassEntry {
    pub id: String,
    /// Localized labels keyed by language code.
    pub name: Value,
}

impl ClassEntry {
    pub fn from_document(doc: Document) -> Self {
        let name = doc
            .fields
            .get("name")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        Self {
            id: doc.id.into(),
            name,
        }
    }
}

/// Fetch the whole class table ordered by id.
pub(crate) async fn fetch_classes<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
) -> Result<Vec<ClassEntry>> {
    let docs = store.query(&Query::collection(collection)).await?;
    Ok(docs.into_iter().map(ClassEntry::from_document).collect())
}

/// Class id to localized label map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassNames(HashMap<String, Value>);

impl ClassNames {
    pub fn from_entries(entries: impl IntoIterator<Item = ClassEntry>) -> Self {
        Self(entries.into_iter().map(|e| (e.id, e.name)).collect())
    }

    /// Label for a class in `language`, falling back to English.
    pub fn label(&self, class_id: &str, language: &LanguageCode) -> Option<&str> {
        localize::text(self.0.get(class_id), language)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct CachedClasses {
    names: Arc<ClassNames>,
    fetched_at: Instant,
}

/// Process-wide, time-bounded cache of the class table.
///
/// Reads share a read lock. A stale read takes the refresh gate, re-checks,
/// and refetches the whole table; the slot is replaced in one write. A
/// failed refetch yields an empty map and leaves the slot untouched, so the
/// next access tries again.
pub struct ClassNameCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: RwLock<Option<CachedClasses>>,
    refresh: Mutex<()>,
}

impl std::fmt::Debug for ClassNameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassNameCache")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ClassNameCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slot: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    async fn fresh(&self) -> Option<Arc<ClassNames>> {
        let slot = self.slot.read().await;
        let cached = slot.as_ref()?;
        let age = self.clock.now().saturating_duration_since(cached.fetched_at);
        (age < self.ttl).then(|| Arc::clone(&cached.names))
    }

    /// Return the class names, refetching them once the window has passed.
    pub async fn get<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        collection: &str,
    ) -> Arc<ClassNames> {
        if let Some(names) = self.fresh().await {
            return names;
        }

        let _gate = self.refresh.lock().await;
        if let Some(names) = self.fresh().await {
            return names;
        }

        let started = self.clock.now();
        match fetch_classes(store, collection).await {
            Ok(entries) => {
                let names = Arc::new(ClassNames::from_entries(entries));
                debug!(classes = names.len(), "Refreshed class names");
                *self.slot.write().await = Some(CachedClasses {
                    names: Arc::clone(&names),
                    fetched_at: started,
                });
                names
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch class names, leaving them unresolved");
                Arc::new(ClassNames::default())
            }
        }
    }
}
