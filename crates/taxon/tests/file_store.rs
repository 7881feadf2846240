mod common;

use std::sync::Arc;

use tempfile::TempDir;

use taxon::{Catalog, CatalogConfig, PageRequest};
use taxon_core::LanguageCode;
use taxon_file::FileStore;

use common::{CLASSES, SPECIES, class, id, species, twelve_animals};

async fn create_test_store() -> (TempDir, FileStore) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());

    for doc in twelve_animals() {
        store.put(SPECIES, Some(doc.id), doc.fields).await.unwrap();
    }
    let fox = species("fox", "Red fox", "Vulpes vulpes", "MAMMALIA");
    store.put(SPECIES, Some(fox.id), fox.fields).await.unwrap();

    let mammals = class("MAMMALIA", "Mammals");
    store
        .put(CLASSES, Some(mammals.id), mammals.fields)
        .await
        .unwrap();

    (dir, store)
}

#[tokio::test]
async fn lists_and_searches_a_file_store() {
    let (_dir, store) = create_test_store().await;
    let catalog = Catalog::new(Arc::new(store), CatalogConfig::default()).unwrap();

    let first = catalog.list_species(&PageRequest::default()).await.unwrap();
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.pagination.total_items, 13);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.items[0].localized_class, "Mammals");

    let found = catalog
        .list_species(&PageRequest {
            search_query: Some("red fox".to_string()),
            ..PageRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, "fox");
    assert_eq!(found.items[0].scientific.name, "Vulpes vulpes");
}

#[tokio::test]
async fn resolves_details_and_id_lookups_from_files() {
    let (_dir, store) = create_test_store().await;
    let catalog = Catalog::new(Arc::new(store), CatalogConfig::default()).unwrap();
    let en = LanguageCode::english();

    let detail = catalog
        .species_detail(&id("fox"), &en, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.localized_summary, ["About Red fox."]);

    let result = catalog
        .species_by_ids(&[id("fox"), id("a02")], &en, None)
        .await
        .unwrap();
    let ids: Vec<_> = result.items.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["fox", "a02"]);
}

#[tokio::test]
async fn missing_store_root_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("absent"));
    let catalog = Catalog::new(Arc::new(store), CatalogConfig::default()).unwrap();

    let err = catalog
        .list_species(&PageRequest::default())
        .await
        .unwrap_err();

    assert!(err.is_store_unavailable());
}
