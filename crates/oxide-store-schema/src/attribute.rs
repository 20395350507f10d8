//! Attribute descriptors.
//!
//! An [`Attribute`] describes one property of a model class: how it is keyed,
//! whether it can be matched against in queries, and what kind of storage it
//! needs. Scalar attributes may get a column on the class table, collections
//! get a join table, and joined data gets a dedicated id/value table.

use serde::{Deserialize, Serialize};

use crate::naming::quote_identifier;

/// The JSON key reserved for the primary key column.
pub const ID_KEY: &str = "id";

/// SQL column types a scalar attribute can be stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Text.
    Text,
    /// Integer number.
    Integer,
    /// Boolean, stored as 0/1.
    Boolean,
    /// Date and time, stored as unix seconds.
    DateTime,
}

impl ColumnType {
    /// Returns the `SQLite` type name.
    #[must_use]
    pub const fn sqlite_name(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer | Self::Boolean | Self::DateTime => "INTEGER",
        }
    }
}

/// The storage kind of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeKind {
    /// A single value kept in the model's data blob, optionally mirrored in a column.
    Scalar {
        /// Column type, or `None` when the value only lives in the blob.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_type: Option<ColumnType>,
    },
    /// A collection of related models, indexed through a join table.
    Collection {
        /// Name of the related class.
        item_class: String,
        /// Owner attributes whose columns are copied into the join table.
        #[serde(default)]
        join_queryable_by: Vec<String>,
    },
    /// A large value kept outside the blob in its own table.
    JoinedData {
        /// Name of the id/value table holding the data.
        model_table: String,
    },
}

/// Descriptor for a single model attribute.
///
/// # Example
///
/// ```
/// use oxide_store_schema::Attribute;
///
/// let unread = Attribute::boolean("unread").queryable(true);
/// assert_eq!(unread.column_sql().as_deref(), Some("`unread` INTEGER"));
///
/// let folders = Attribute::collection("folders", "Folder")
///     .queryable(true)
///     .join_queryable_by(["lastMessageTimestamp"]);
/// assert_eq!(folders.item_class(), Some("Folder"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Key of the attribute on the model.
    pub model_key: String,
    /// Whether queries can match against this attribute.
    #[serde(default)]
    pub queryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    json_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_column: Option<String>,
    /// Storage kind.
    #[serde(flatten)]
    pub kind: AttributeKind,
}

impl Attribute {
    /// Creates an attribute of the given kind.
    pub fn new(model_key: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            model_key: model_key.into(),
            queryable: false,
            json_key: None,
            table_column: None,
            kind,
        }
    }

    /// Creates a scalar attribute.
    pub fn scalar(model_key: impl Into<String>, column_type: Option<ColumnType>) -> Self {
        Self::new(model_key, AttributeKind::Scalar { column_type })
    }

    /// Creates a text attribute.
    pub fn string(model_key: impl Into<String>) -> Self {
        Self::scalar(model_key, Some(ColumnType::Text))
    }

    /// Creates a numeric attribute.
    pub fn number(model_key: impl Into<String>) -> Self {
        Self::scalar(model_key, Some(ColumnType::Integer))
    }

    /// Creates a boolean attribute.
    pub fn boolean(model_key: impl Into<String>) -> Self {
        Self::scalar(model_key, Some(ColumnType::Boolean))
    }

    /// Creates a date-time attribute.
    pub fn date_time(model_key: impl Into<String>) -> Self {
        Self::scalar(model_key, Some(ColumnType::DateTime))
    }

    /// Creates an attribute that is only stored in the data blob.
    pub fn object(model_key: impl Into<String>) -> Self {
        Self::scalar(model_key, None)
    }

    /// Creates a collection attribute holding instances of `item_class`.
    pub fn collection(model_key: impl Into<String>, item_class: impl Into<String>) -> Self {
        Self::new(
            model_key,
            AttributeKind::Collection {
                item_class: item_class.into(),
                join_queryable_by: Vec::new(),
            },
        )
    }

    /// Creates a joined-data attribute stored in `model_table`.
    pub fn joined_data(model_key: impl Into<String>, model_table: impl Into<String>) -> Self {
        Self::new(
            model_key,
            AttributeKind::JoinedData {
                model_table: model_table.into(),
            },
        )
    }

    /// Sets the queryable flag.
    #[must_use]
    pub const fn queryable(mut self, value: bool) -> Self {
        self.queryable = value;
        self
    }

    /// Overrides the JSON key (defaults to the model key).
    #[must_use]
    pub fn with_json_key(mut self, json_key: impl Into<String>) -> Self {
        self.json_key = Some(json_key.into());
        self
    }

    /// Overrides the table column name (defaults to the model key).
    #[must_use]
    pub fn with_table_column(mut self, column: impl Into<String>) -> Self {
        self.table_column = Some(column.into());
        self
    }

    /// Appends owner attributes to replicate into the join table.
    ///
    /// Has no effect on attributes that are not collections.
    #[must_use]
    pub fn join_queryable_by<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let AttributeKind::Collection {
            join_queryable_by, ..
        } = &mut self.kind
        {
            join_queryable_by.extend(keys.into_iter().map(Into::into));
        }
        self
    }

    /// Returns the JSON key.
    #[must_use]
    pub fn json_key(&self) -> &str {
        self.json_key.as_deref().unwrap_or(&self.model_key)
    }

    /// Returns the table column name.
    #[must_use]
    pub fn table_column(&self) -> &str {
        self.table_column.as_deref().unwrap_or(&self.model_key)
    }

    /// Returns whether this attribute holds the primary key.
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.json_key() == ID_KEY
    }

    /// Returns the column definition fragment, if this attribute has one.
    #[must_use]
    pub fn column_sql(&self) -> Option<String> {
        match self.kind {
            AttributeKind::Scalar {
                column_type: Some(column_type),
            } => Some(format!(
                "{} {}",
                quote_identifier(self.table_column()),
                column_type.sqlite_name()
            )),
            _ => None,
        }
    }

    /// Returns the related class name for collections.
    #[must_use]
    pub fn item_class(&self) -> Option<&str> {
        match &self.kind {
            AttributeKind::Collection { item_class, .. } => Some(item_class),
            _ => None,
        }
    }

    /// Returns the model table for joined data.
    #[must_use]
    pub fn model_table(&self) -> Option<&str> {
        match &self.kind {
            AttributeKind::JoinedData { model_table } => Some(model_table),
            _ => None,
        }
    }
}
