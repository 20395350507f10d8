//! Class descriptors.
//!
//! A model class is anything implementing [`ModelClass`]: a name used as the
//! table name and an ordered list of attributes. [`ClassDescriptor`] is the
//! owned, serializable implementation used by schema files and by
//! `#[derive(Model)]`.

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;

/// Extra `SQLite` setup a class contributes after its generated tables.
pub trait AdditionalSqliteConfig {
    /// Returns statements appended verbatim to the class setup statements.
    fn setup(&self) -> Vec<String>;
}

/// A model class whose storage layout can be derived.
pub trait ModelClass {
    /// Returns the class name, which is also the main table name.
    fn name(&self) -> &str;

    /// Returns the attributes in declared order.
    fn attributes(&self) -> &[Attribute];

    /// Looks up an attribute by model key.
    fn attribute(&self, model_key: &str) -> Option<&Attribute> {
        self.attributes()
            .iter()
            .find(|attr| attr.model_key == model_key)
    }

    /// Returns the class's extra `SQLite` setup, if it has any.
    fn additional_sqlite_config(&self) -> Option<&dyn AdditionalSqliteConfig> {
        None
    }
}

/// Types with a statically known class descriptor.
///
/// Usually implemented with `#[derive(Model)]`.
pub trait Model {
    /// Builds the descriptor for this type.
    fn class_descriptor() -> ClassDescriptor;
}

/// A fixed list of extra setup statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Statements to run after the generated ones.
    #[serde(default)]
    pub setup: Vec<String>,
}

impl AdditionalSqliteConfig for SqliteConfig {
    fn setup(&self) -> Vec<String> {
        self.setup.clone()
    }
}

/// An owned model class description.
///
/// # Example
///
/// ```
/// use oxide_store_schema::{Attribute, ClassDescriptor, ModelClass};
///
/// let thread = ClassDescriptor::new("Thread")
///     .with_attribute(Attribute::string("id").queryable(true))
///     .with_attribute(Attribute::boolean("unread").queryable(true))
///     .setup_statement("CREATE INDEX IF NOT EXISTS `ThreadUnread` ON `Thread` (`unread`)");
///
/// assert_eq!(thread.name(), "Thread");
/// assert!(thread.attribute("unread").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Class name.
    pub name: String,
    /// Attributes in declared order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Extra setup statements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_sqlite_config: Option<SqliteConfig>,
}

impl ClassDescriptor {
    /// Creates a class with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            additional_sqlite_config: None,
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds several attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Adds an extra setup statement.
    #[must_use]
    pub fn setup_statement(self, sql: impl Into<String>) -> Self {
        self.setup_statements([sql])
    }

    /// Adds extra setup statements.
    #[must_use]
    pub fn setup_statements<I, S>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_sqlite_config
            .get_or_insert_with(SqliteConfig::default)
            .setup
            .extend(statements.into_iter().map(Into::into));
        self
    }
}

impl ModelClass for ClassDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn additional_sqlite_config(&self) -> Option<&dyn AdditionalSqliteConfig> {
        self.additional_sqlite_config
            .as_ref()
            .map(|config| config as &dyn AdditionalSqliteConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup_by_model_key() {
        let class = ClassDescriptor::new("Message")
            .with_attribute(Attribute::string("subject").with_json_key("subj"))
            .with_attribute(Attribute::boolean("draft"));

        assert_eq!(class.attribute("subject").map(Attribute::json_key), Some("subj"));
        assert!(class.attribute("subj").is_none());
        assert!(class.attribute("missing").is_none());
    }

    #[test]
    fn test_setup_statements_accumulate() {
        let class = ClassDescriptor::new("Thread")
            .setup_statement("PRAGMA a")
            .setup_statements(["PRAGMA b", "PRAGMA c"]);

        let config = class.additional_sqlite_config().unwrap();
        assert_eq!(config.setup(), vec!["PRAGMA a", "PRAGMA b", "PRAGMA c"]);
    }

    #[test]
    fn test_no_additional_config_by_default() {
        assert!(ClassDescriptor::new("Contact")
            .additional_sqlite_config()
            .is_none());
    }

    #[test]
    fn test_deserialize_descriptor() {
        let class: ClassDescriptor = serde_json::from_str(
            r#"{
                "name": "Thread",
                "attributes": [
                    {"model_key": "id", "queryable": true, "kind": "scalar", "column_type": "text"},
                    {"model_key": "body", "kind": "joined_data", "model_table": "ThreadBody"}
                ],
                "additional_sqlite_config": {"setup": ["PRAGMA foo"]}
            }"#,
        )
        .unwrap();

        assert_eq!(class.name(), "Thread");
        assert_eq!(class.attributes().len(), 2);
        assert_eq!(class.attributes()[1].model_table(), Some("ThreadBody"));
        let config = class.additional_sqlite_config().unwrap();
        assert_eq!(config.setup(), vec!["PRAGMA foo"]);
    }
}
