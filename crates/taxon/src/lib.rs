//! taxon - Paginated, searchable species catalog.
//!
//! The catalog reads species documents from a [`DocumentStore`] that can
//! only filter by equality and array membership and sort on one field.
//! Free-text search is layered on top: the store pre-filters on whole
//! tokens, and each fetched page is re-checked with substring matching.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use taxon::{Catalog, CatalogConfig, PageRequest};
//! use taxon_core::DocumentStore;
//!
//! # async fn example<S: DocumentStore>(store: Arc<S>) -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new(store, CatalogConfig::default())?;
//!
//! let first = catalog
//!     .list_species(&PageRequest {
//!         search_query: Some("red fox".to_string()),
//!         ..PageRequest::default()
//!     })
//!     .await?;
//!
//! for species in &first.items {
//!     println!("{}: {}", species.id, species.localized_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod classes;
pub mod config;
pub mod images;
pub mod localize;
pub mod observation;
pub mod pagination;
pub mod projector;
pub mod record;
pub mod search;

pub use catalog::Catalog;
pub use classes::{ClassEntry, ClassNameCache, ClassNames};
pub use config::{CatalogConfig, ConfigError};
pub use images::{CdnImageUrls, ImageUrls};
pub use observation::ObservationStatus;
pub use pagination::{PageRequest, Pagination, PaginationResult};
pub use projector::{ScientificNames, SpeciesDetail, SpeciesSummary};
pub use search::SearchTerms;

pub use taxon_core::{DocumentStore, Error, LanguageCode, Result};
