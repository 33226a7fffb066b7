//! Error types for label catalogs.

use thiserror::Error;

/// Errors raised while loading a label catalog.
///
/// Resolving a label never fails: a missing entry falls back to the raw
/// value. Only building a catalog from external input can go wrong.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    /// The catalog source could not be parsed.
    #[error("label catalog parse error: {0}")]
    Parse(String),

    /// A catalog entry is neither a string nor a nested table.
    #[error("label entry '{key}' must be a string or table, found {found}")]
    InvalidEntry { key: String, found: String },
}

/// Convenience type alias for label catalog operations.
pub type LabelResult<T> = std::result::Result<T, LabelError>;
