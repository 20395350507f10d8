//! SQL statement generation for model classes.
//!
//! Every class is stored in a table named after it with an `id` primary key
//! and a `data` blob holding the serialized instance. Queryable scalar
//! attributes are mirrored into extra columns, queryable collections get a
//! `<Owner>-<Item>` join table, and joined data lives in its own id/value
//! table. All statements are guarded with `IF NOT EXISTS` so they can run on
//! every startup.

use tracing::debug;

use crate::class::ModelClass;
use crate::classify::{AttributeClassification, CollectionAttribute};
use crate::error::{Result, SchemaError};
use crate::naming::{index_prefix_for_join_table, quote_identifier, table_name_for_join};

const MAIN_TABLE_COLUMNS: [&str; 2] = ["id TEXT PRIMARY KEY", "data BLOB"];
const JOIN_TABLE_COLUMNS: [&str; 2] = ["id TEXT KEY", "`value` TEXT"];
const JOINED_DATA_COLUMNS: [&str; 2] = ["id TEXT PRIMARY KEY", "`value` TEXT"];

/// Returns the statements refreshing query planner statistics for `class`.
///
/// One `ANALYZE` for the class table followed by one per queryable collection
/// join table, in declared order.
///
/// ```
/// use oxide_store_schema::{analyze_queries_for_class, Attribute, ClassDescriptor};
///
/// let thread = ClassDescriptor::new("Thread")
///     .with_attribute(Attribute::collection("folders", "Folder").queryable(true));
///
/// assert_eq!(
///     analyze_queries_for_class(&thread),
///     vec!["ANALYZE `Thread`", "ANALYZE `Thread-Folder`"]
/// );
/// ```
pub fn analyze_queries_for_class<C: ModelClass + ?Sized>(class: &C) -> Vec<String> {
    let classification = AttributeClassification::of(class);

    let mut queries = Vec::with_capacity(1 + classification.collections.len());
    queries.push(format!("ANALYZE {}", quote_identifier(class.name())));
    for collection in &classification.collections {
        let join_table = table_name_for_join(class.name(), collection.item_class);
        queries.push(format!("ANALYZE {}", quote_identifier(&join_table)));
    }

    debug!(
        class = class.name(),
        statements = queries.len(),
        "Generated analyze statements"
    );
    queries
}

/// Returns the statements creating every table and index `class` needs.
///
/// The class table comes first, followed by its `id` index, then each
/// collection's join table and indexes, then joined-data tables, then any
/// statements from the class's additional `SQLite` config.
///
/// # Errors
///
/// Returns an error if a collection's `join_queryable_by` names an attribute
/// the class does not declare, or one that has no column representation.
/// Nothing is returned in that case.
pub fn setup_queries_for_class<C: ModelClass + ?Sized>(class: &C) -> Result<Vec<String>> {
    let classification = AttributeClassification::of(class);
    let table = class.name();
    let mut queries = Vec::new();

    let columns: Vec<String> = MAIN_TABLE_COLUMNS
        .iter()
        .map(|column| (*column).to_string())
        .chain(
            classification
                .columns
                .iter()
                .filter_map(|attribute| attribute.column_sql()),
        )
        .collect();
    queries.push(create_table_sql(table, &columns.join(",")));
    queries.push(create_index_sql(
        &format!("{table}_id"),
        table,
        &["`id`"],
        true,
    ));

    for collection in &classification.collections {
        queries.extend(join_table_sql(class, collection)?);
    }

    for joined in &classification.joined_data {
        debug!(
            class = table,
            attribute = %joined.attribute.model_key,
            model_table = joined.model_table,
            "Generating joined data table"
        );
        queries.push(create_table_sql(
            joined.model_table,
            &JOINED_DATA_COLUMNS.join(", "),
        ));
    }

    if let Some(config) = class.additional_sqlite_config() {
        queries.extend(config.setup());
    }

    for sql in &queries {
        debug!(class = table, sql = %sql, "Generated setup statement");
    }
    Ok(queries)
}

/// Generates the join table and its two indexes for one collection.
fn join_table_sql<C: ModelClass + ?Sized>(
    class: &C,
    collection: &CollectionAttribute<'_>,
) -> Result<[String; 3]> {
    let join_table = table_name_for_join(class.name(), collection.item_class);
    let index_prefix = index_prefix_for_join_table(&join_table);
    debug!(
        class = class.name(),
        attribute = %collection.attribute.model_key,
        join_table = %join_table,
        "Generating join table"
    );

    let mut columns: Vec<String> = JOIN_TABLE_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    for key in collection.join_queryable_by {
        columns.push(join_column_sql(class, key)?);
    }

    Ok([
        create_table_sql(&join_table, &columns.join(",")),
        create_index_sql(
            &format!("{index_prefix}_id"),
            &join_table,
            &["`id` ASC"],
            false,
        ),
        create_index_sql(
            &format!("{index_prefix}_val_id"),
            &join_table,
            &["`value` ASC", "`id` ASC"],
            true,
        ),
    ])
}

/// Resolves a join-queryable key against the owning class.
fn join_column_sql<C: ModelClass + ?Sized>(class: &C, key: &str) -> Result<String> {
    let attribute = class
        .attribute(key)
        .ok_or_else(|| SchemaError::UnknownAttribute {
            class: class.name().to_string(),
            attribute: key.to_string(),
        })?;
    attribute
        .column_sql()
        .ok_or_else(|| SchemaError::MissingColumnSql {
            class: class.name().to_string(),
            attribute: key.to_string(),
        })
}

fn create_table_sql(name: &str, columns: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({columns})",
        quote_identifier(name)
    )
}

fn create_index_sql(name: &str, table: &str, columns: &[&str], unique: bool) -> String {
    let mut sql = String::from("CREATE ");
    if unique {
        sql.push_str("UNIQUE ");
    }
    sql.push_str("INDEX IF NOT EXISTS ");
    sql.push_str(&quote_identifier(name));
    sql.push_str(" ON ");
    sql.push_str(&quote_identifier(table));
    sql.push_str(" (");
    sql.push_str(&columns.join(", "));
    sql.push(')');
    sql
}
