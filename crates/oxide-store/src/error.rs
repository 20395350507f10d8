//! Error types for applying schemas.

use std::path::PathBuf;

use oxide_store_schema::SchemaError;

/// Errors that can occur while loading or applying a schema.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A class descriptor could not be turned into statements.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Database error while executing statements.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error reading a schema file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a schema file.
    #[error("Failed to parse schema file '{path}': {source}")]
    ParseError {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No class with this name is defined.
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// The same class name is defined twice.
    #[error("Class '{0}' is defined more than once")]
    DuplicateClass(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
