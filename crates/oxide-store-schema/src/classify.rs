//! Attribute classification.
//!
//! Splits a class's attributes by the storage they need: extra columns on the
//! class table, join tables for collections, and value tables for joined data.

use crate::attribute::{Attribute, AttributeKind};
use crate::class::ModelClass;

/// A queryable collection attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionAttribute<'a> {
    /// The underlying attribute.
    pub attribute: &'a Attribute,
    /// Name of the related class.
    pub item_class: &'a str,
    /// Owner attribute keys replicated into the join table.
    pub join_queryable_by: &'a [String],
}

/// A joined-data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinedDataAttribute<'a> {
    /// The underlying attribute.
    pub attribute: &'a Attribute,
    /// Name of the id/value table.
    pub model_table: &'a str,
}

/// Attributes of one class, partitioned by storage, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeClassification<'a> {
    /// Queryable attributes with column SQL, other than the `id` key.
    pub columns: Vec<&'a Attribute>,
    /// Queryable collections.
    pub collections: Vec<CollectionAttribute<'a>>,
    /// Joined data, queryable or not.
    pub joined_data: Vec<JoinedDataAttribute<'a>>,
}

impl<'a> AttributeClassification<'a> {
    /// Classifies the attributes of `class`.
    pub fn of<C: ModelClass + ?Sized>(class: &'a C) -> Self {
        let mut classification = Self::default();

        for attribute in class.attributes() {
            match &attribute.kind {
                AttributeKind::Scalar { .. } => {
                    if attribute.queryable
                        && attribute.column_sql().is_some()
                        && !attribute.is_id()
                    {
                        classification.columns.push(attribute);
                    }
                }
                AttributeKind::Collection {
                    item_class,
                    join_queryable_by,
                } => {
                    if attribute.queryable {
                        classification.collections.push(CollectionAttribute {
                            attribute,
                            item_class,
                            join_queryable_by,
                        });
                    }
                }
                AttributeKind::JoinedData { model_table } => {
                    classification.joined_data.push(JoinedDataAttribute {
                        attribute,
                        model_table,
                    });
                }
            }
        }

        classification
    }
}
