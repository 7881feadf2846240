//! Error types for the catalog.
//!
//! Store failures and input validation failures are the only errors the
//! core raises. Lookups that miss are reported as `None`, and lookups whose
//! failure only degrades the output (class names, observations) are logged
//! and defaulted by the caller instead of surfacing here.

use thiserror::Error;

/// The unified error type for catalog operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing document store could not serve the request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Input validation errors (invalid id, language code, query shape).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this error originated in the document store.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

/// Backend-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The store did not answer in time.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Local IO failure.
    #[error("IO error: {message}")]
    Io { message: String },

    /// A stored document could not be decoded.
    #[error("corrupt document '{id}': {message}")]
    Corrupt { id: String, message: String },
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            StoreError::Timeout { duration_ms: 0 }
        } else {
            StoreError::Io {
                message: err.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StoreUnavailable(StoreError::from(err))
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid document id.
    #[error("invalid document id '{value}': {reason}")]
    DocumentId { value: String, reason: String },

    /// Invalid language code.
    #[error("invalid language code '{value}': {reason}")]
    LanguageCode { value: String, reason: String },

    /// A query the store cannot express.
    #[error("unsupported query: {reason}")]
    Query { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
