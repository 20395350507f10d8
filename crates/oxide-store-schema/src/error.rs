//! Error types for schema generation.

use thiserror::Error;

/// Errors raised while deriving DDL from a class descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A collection names a join-queryable attribute the owning class does not declare.
    #[error("class '{class}' has no attribute '{attribute}'")]
    UnknownAttribute {
        /// The owning class.
        class: String,
        /// The attribute key that could not be resolved.
        attribute: String,
    },

    /// A join-queryable attribute exists but cannot be stored in a column.
    #[error("attribute '{class}.{attribute}' has no column representation")]
    MissingColumnSql {
        /// The owning class.
        class: String,
        /// The attribute key without column SQL.
        attribute: String,
    },
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
