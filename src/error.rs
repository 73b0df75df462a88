//! Error types for content schemas
//!
//! The resolver core never fails; these errors come from loading registries,
//! strict version parsing and document validation.

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Content schema errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema entry not found: {0}")]
    NotFound(String),

    #[error("No schema entry matches {path}")]
    NoMatchingEntry { path: String },

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Document failed validation with {} error(s)", .0.len())]
    Validation(Vec<String>),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
