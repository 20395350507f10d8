//! Applies oxide-store schemas to `SQLite` databases.
//!
//! `oxide-store` takes the statements generated by `oxide-store-schema` and
//! runs them against a database:
//!
//! - **Schema files** - JSON lists of class descriptors
//! - **Executor** - Runs setup and analyze statements, or prints them in dry-run mode
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_store::prelude::*;
//!
//! let schema = SchemaFile::from_path("schema.json")?;
//!
//! let executor = SchemaExecutor::connect("sqlite:store.sqlite3", false).await?;
//! executor.setup_all(schema.classes()).await?;
//! executor.analyze_all(schema.classes()).await?;
//! ```
//!
//! # CLI
//!
//! ```bash
//! # Print the setup statements of every class
//! oxide-store --schema schema.json sql
//!
//! # Create missing tables and indexes
//! oxide-store --schema schema.json --database sqlite:store.sqlite3 setup
//!
//! # Refresh statistics for one class
//! oxide-store analyze --class Thread
//! ```

pub mod error;
pub mod executor;
pub mod schema_file;

pub use error::{Result, StoreError};
pub use executor::SchemaExecutor;
pub use schema_file::SchemaFile;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, StoreError};
    pub use crate::executor::SchemaExecutor;
    pub use crate::schema_file::SchemaFile;
    pub use oxide_store_schema::{
        analyze_queries_for_class, setup_queries_for_class, Attribute, ClassDescriptor,
        ModelClass,
    };
}
