//! Core catalog types.
//!
//! These types enforce their invariants at construction time,
//! so invalid identifiers never reach a store.

mod document_id;
mod language_code;

pub use document_id::DocumentId;
pub use language_code::LanguageCode;
