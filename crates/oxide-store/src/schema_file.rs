//! JSON schema files.
//!
//! A schema file lists the class descriptors of an application:
//!
//! ```json
//! {
//!   "classes": [
//!     {
//!       "name": "Thread",
//!       "attributes": [
//!         {"model_key": "id", "queryable": true, "kind": "scalar", "column_type": "text"},
//!         {"model_key": "unread", "queryable": true, "kind": "scalar", "column_type": "boolean"},
//!         {"model_key": "folders", "queryable": true, "kind": "collection",
//!          "item_class": "Folder", "join_queryable_by": ["unread"]}
//!       ],
//!       "additional_sqlite_config": {"setup": ["PRAGMA foo"]}
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use oxide_store_schema::{ClassDescriptor, ModelClass};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// The class descriptors of an application, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    classes: Vec<ClassDescriptor>,
}

impl SchemaFile {
    /// Creates a schema from class descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateClass`] if two classes share a name.
    pub fn new(classes: Vec<ClassDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for class in &classes {
            if !seen.insert(class.name()) {
                return Err(StoreError::DuplicateClass(class.name().to_string()));
            }
        }

        for class in &classes {
            for attribute in class.attributes() {
                if let Some(item_class) = attribute.item_class() {
                    if !seen.contains(item_class) {
                        warn!(
                            class = class.name(),
                            attribute = %attribute.model_key,
                            item_class,
                            "Collection refers to a class not defined in this schema"
                        );
                    }
                }
            }
        }

        Ok(Self { classes })
    }

    /// Parses a schema from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or defines a class twice.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(json)?;
        Self::new(raw.classes)
    }

    /// Reads a schema from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading schema file");

        let json = std::fs::read_to_string(path)?;
        let raw: Self = serde_json::from_str(&json).map_err(|source| StoreError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(raw.classes)
    }

    /// Serializes the schema as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns all classes in declared order.
    #[must_use]
    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    /// Looks up a class by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownClass`] if no class has this name.
    pub fn class(&self, name: &str) -> Result<&ClassDescriptor> {
        self.classes
            .iter()
            .find(|class| class.name() == name)
            .ok_or_else(|| StoreError::UnknownClass(name.to_string()))
    }

    /// Returns the named class, or every class when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownClass`] if `name` is not defined.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<&ClassDescriptor>> {
        match name {
            Some(name) => Ok(vec![self.class(name)?]),
            None => Ok(self.classes.iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_store_schema::Attribute;
    use std::io::Write;

    const THREADS: &str = r#"{
        "classes": [
            {
                "name": "Thread",
                "attributes": [
                    {"model_key": "id", "queryable": true, "kind": "scalar", "column_type": "text"},
                    {"model_key": "unread", "queryable": true, "kind": "scalar", "column_type": "boolean"},
                    {"model_key": "folders", "queryable": true, "kind": "collection",
                     "item_class": "Folder", "join_queryable_by": ["unread"]}
                ]
            },
            {"name": "Folder"}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let schema = SchemaFile::from_json(THREADS).unwrap();
        assert_eq!(schema.classes().len(), 2);

        let thread = schema.class("Thread").unwrap();
        assert_eq!(thread.attributes().len(), 3);
        assert_eq!(
            thread.attribute("folders"),
            Some(
                &Attribute::collection("folders", "Folder")
                    .queryable(true)
                    .join_queryable_by(["unread"])
            )
        );
        assert!(schema.class("Folder").unwrap().attributes().is_empty());
    }

    #[test]
    fn test_unknown_class() {
        let schema = SchemaFile::from_json(THREADS).unwrap();
        assert!(matches!(
            schema.class("Contact"),
            Err(StoreError::UnknownClass(name)) if name == "Contact"
        ));
        assert!(schema.select(Some("Contact")).is_err());
    }

    #[test]
    fn test_select() {
        let schema = SchemaFile::from_json(THREADS).unwrap();
        assert_eq!(schema.select(None).unwrap().len(), 2);

        let selected = schema.select(Some("Folder")).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name(), "Folder");
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let result = SchemaFile::new(vec![
            ClassDescriptor::new("Thread"),
            ClassDescriptor::new("Thread"),
        ]);
        assert!(matches!(result, Err(StoreError::DuplicateClass(name)) if name == "Thread"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SchemaFile::from_json(r#"{"classes": [{"attributes": []}]}"#),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_from_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(THREADS.as_bytes()).unwrap();

        let schema = SchemaFile::from_path(path).unwrap();
        let reparsed = SchemaFile::from_json(&schema.to_json().unwrap()).unwrap();
        assert_eq!(schema, reparsed);
    }

    #[test]
    fn test_from_path_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        match SchemaFile::from_path(&path) {
            Err(StoreError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SchemaFile::from_path(dir.path().join("missing.json")),
            Err(StoreError::Io(_))
        ));
    }
}
