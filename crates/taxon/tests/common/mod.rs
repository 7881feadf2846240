#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use taxon_core::error::StoreError;
use taxon_core::{Document, DocumentId, DocumentStore, Query, Result};

pub const SPECIES: &str = "species";
pub const CLASSES: &str = "speciesClass";
pub const OBSERVATIONS: &str = "observations";

/// In-memory store that counts calls per collection and can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, Vec<Document>>>,
    queries: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, doc: Document) {
        self.docs
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }

    pub fn insert_all(&self, collection: &str, docs: impl IntoIterator<Item = Document>) {
        for doc in docs {
            self.insert(collection, doc);
        }
    }

    /// Queries issued against a collection so far, counts excluded.
    pub fn queries(&self, collection: &str) -> usize {
        self.queries
            .lock()
            .unwrap()
            .get(collection)
            .copied()
            .unwrap_or(0)
    }

    pub fn fail(&self, collection: &str) {
        self.failing.lock().unwrap().insert(collection.to_string());
    }

    pub fn recover(&self, collection: &str) {
        self.failing.lock().unwrap().remove(collection);
    }

    fn check(&self, collection: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(collection) {
            return Err(StoreError::Connection {
                message: format!("{collection} is offline"),
            }
            .into());
        }
        Ok(())
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.docs
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        self.check(collection)?;
        Ok(self
            .snapshot(collection)
            .into_iter()
            .find(|doc| &doc.id == id))
    }

    async fn get_many(&self, collection: &str, ids: &[DocumentId]) -> Result<Vec<Document>> {
        self.check(collection)?;
        Ok(self
            .snapshot(collection)
            .into_iter()
            .filter(|doc| ids.contains(&doc.id))
            .collect())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>> {
        *self
            .queries
            .lock()
            .unwrap()
            .entry(query.collection.clone())
            .or_default() += 1;
        self.check(&query.collection)?;
        query.evaluate(self.snapshot(&query.collection))
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        self.check(&query.collection)?;
        query.count(&self.snapshot(&query.collection))
    }
}

pub fn id(s: &str) -> DocumentId {
    DocumentId::new(s).unwrap()
}

pub fn doc(doc_id: &str, value: Value) -> Document {
    let fields: Map<String, Value> = value.as_object().cloned().unwrap();
    Document::new(id(doc_id), fields)
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// A species record with English and Vietnamese names.
pub fn species(doc_id: &str, en: &str, scientific: &str, class_id: &str) -> Document {
    let vi = format!("{en} (vi)");
    doc(
        doc_id,
        json!({
            "classId": class_id,
            "name": { "en": en, "vi": vi },
            "nameTokens": { "en": tokens(en), "vi": tokens(&vi) },
            "family": { "en": format!("{en} family"), "scientific": "Testidae" },
            "scientificName": scientific,
            "scientificNameToken": tokens(scientific),
            "imageURL": [format!("{doc_id}/main.jpg")],
            "summary": { "en": format!("About {en}.") },
        }),
    )
}

pub fn class(doc_id: &str, en: &str) -> Document {
    doc(doc_id, json!({ "name": { "en": en } }))
}

/// Twelve mammals `a00`..`a11` named so they sort in id order.
pub fn twelve_animals() -> Vec<Document> {
    (0..12)
        .map(|i| {
            species(
                &format!("a{i:02}"),
                &format!("Animal {i:02}"),
                &format!("Animalia number{i:02}"),
                "MAMMALIA",
            )
        })
        .collect()
}

pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_all(SPECIES, twelve_animals());
    store.insert_all(
        CLASSES,
        [class("MAMMALIA", "Mammals"), class("AVES", "Birds")],
    );
    store
}

pub fn ids<T>(items: &[T], key: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| key(item).to_string()).collect()
}
