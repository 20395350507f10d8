//! # oxide-store-schema
//!
//! Model descriptors and `SQLite` DDL generation for the oxide-store object
//! store.
//!
//! Model instances are persisted as a serialized `data` blob keyed by `id`.
//! Everything else a class needs in the database is derived from its
//! attribute schema:
//!
//! - queryable scalar attributes become extra columns on the class table,
//! - queryable collections get an `<Owner>-<Item>` join table,
//! - joined data gets its own `id`/`value` table,
//! - each class can append its own setup statements.
//!
//! ## Quick Start
//!
//! ```
//! use oxide_store_schema::{
//!     analyze_queries_for_class, setup_queries_for_class, Attribute, ClassDescriptor,
//! };
//!
//! let thread = ClassDescriptor::new("Thread")
//!     .with_attribute(Attribute::string("id").queryable(true))
//!     .with_attribute(Attribute::boolean("unread").queryable(true))
//!     .with_attribute(
//!         Attribute::collection("folders", "Folder")
//!             .queryable(true)
//!             .join_queryable_by(["unread"]),
//!     )
//!     .with_attribute(Attribute::joined_data("body", "ThreadBody"));
//!
//! let setup = setup_queries_for_class(&thread)?;
//! assert_eq!(
//!     setup[0],
//!     "CREATE TABLE IF NOT EXISTS `Thread` (id TEXT PRIMARY KEY,data BLOB,`unread` INTEGER)"
//! );
//! assert_eq!(setup.len(), 6);
//!
//! let analyze = analyze_queries_for_class(&thread);
//! assert_eq!(analyze, vec!["ANALYZE `Thread`", "ANALYZE `Thread-Folder`"]);
//! # Ok::<(), oxide_store_schema::SchemaError>(())
//! ```
//!
//! ## Deriving descriptors
//!
//! With `oxide-store-derive`, a struct can describe itself:
//!
//! ```ignore
//! use oxide_store_derive::Model;
//! use oxide_store_schema::Model as _;
//!
//! #[derive(Model)]
//! #[model(name = "Thread")]
//! struct Thread {
//!     #[attribute(queryable)]
//!     id: String,
//!     #[attribute(queryable)]
//!     unread: bool,
//!     #[attribute(queryable, collection = "Folder", join_queryable_by = "unread")]
//!     folders: Vec<Folder>,
//! }
//!
//! let setup = setup_queries_for_class(&Thread::class_descriptor())?;
//! ```

mod attribute;
mod class;
mod classify;
mod error;
mod naming;
mod queries;

pub use attribute::{Attribute, AttributeKind, ColumnType, ID_KEY};
pub use class::{AdditionalSqliteConfig, ClassDescriptor, Model, ModelClass, SqliteConfig};
pub use classify::{AttributeClassification, CollectionAttribute, JoinedDataAttribute};
pub use error::{Result, SchemaError};
pub use naming::{index_prefix_for_join_table, quote_identifier, table_name_for_join};
pub use queries::{analyze_queries_for_class, setup_queries_for_class};
