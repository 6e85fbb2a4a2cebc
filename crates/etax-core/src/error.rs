//! Error types for the etax-core library.
//!
//! None of these are produced by resolution itself. Unknown codes, blank
//! input and a missing store are absorbed by the resolver; errors only come
//! out of setup paths such as loading catalogs, datasets and configuration.

use thiserror::Error;

/// Main error type for the etax library.
#[derive(Error, Debug)]
pub enum EtaxError {
    /// Reference store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Code-list catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Structured code composition error.
    #[error("structured code error: {0}")]
    StructuredCode(#[from] StructuredCodeError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by a reference store backend.
///
/// The resolver treats every variant as a lookup miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend cannot be reached.
    #[error("store unavailable")]
    Unavailable,

    /// The backend failed while answering a query.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Errors related to code-list policies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No policy registered under the given list id.
    #[error("unknown code list: {0}")]
    UnknownList(String),

    /// Two policies share the same list id in one source.
    #[error("duplicate code list: {0}")]
    DuplicateList(String),

    /// A policy is internally inconsistent.
    #[error("invalid policy for {list}: {reason}")]
    InvalidPolicy { list: String, reason: String },
}

/// Errors raised when composing a structured code from its parts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuredCodeError {
    /// Prefix does not have the schema's fixed width.
    #[error("prefix '{prefix}' must be {expected} characters")]
    PrefixLength { prefix: String, expected: usize },

    /// Suffix does not have the schema's fixed width.
    #[error("suffix '{suffix}' must be {expected} characters")]
    SuffixLength { suffix: String, expected: usize },

    /// Suffix is empty.
    #[error("suffix must not be empty")]
    EmptySuffix,
}

/// Result type for the etax library.
pub type Result<T> = std::result::Result<T, EtaxError>;
