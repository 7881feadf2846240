//! Raw documents as returned by a store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::DocumentId;

/// A document from the store.
///
/// The field map is schema-agnostic: interpretation of catalog fields is
/// left to the engine, which tolerates missing or wrong-typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The store-assigned id of this document.
    pub id: DocumentId,

    /// The document's top-level fields.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document from an id and a field map.
    pub fn new(id: DocumentId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Get a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Resolve a dotted field path such as `name.en`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Return a copy holding only the listed top-level fields.
    pub fn select<S: AsRef<str>>(&self, fields: &[S]) -> Document {
        let fields = fields
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.fields
                    .get(name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect();

        Document {
            id: self.id.clone(),
            fields,
        }
    }
}
