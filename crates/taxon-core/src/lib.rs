//! taxon-core - Core types and traits for the species catalog.

pub mod document;
pub mod error;
pub mod query;
pub mod traits;
pub mod types;

pub use document::Document;
pub use error::Error;
pub use query::{FieldFilter, Query};
pub use traits::{Clock, DocumentStore, ManualClock, SystemClock};
pub use types::{DocumentId, LanguageCode};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
