//! Infers the scientific type of native values.
//!
//! Composite shapes are composed here; scalar shapes go to the convention
//! snapshotted at construction.
use crate::convention::{Convention, ConventionRegistry};
use crate::store::{Column, Table, Value};
use crate::type_system::Tag;
use std::sync::Arc;

/// Classifies values against one convention. Never fails: shapes no rule
/// recognises are `Unknown`.
pub struct Classifier {
    convention: Arc<dyn Convention>,
}

impl Classifier {
    /// Uses the registry's current convention.
    pub fn new(registry: &ConventionRegistry) -> Self {
        Self::with_convention(registry.current())
    }

    pub fn with_convention(convention: Arc<dyn Convention>) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &Arc<dyn Convention> {
        &self.convention
    }

    pub fn classify(&self, value: &Value) -> Tag {
        match value {
            Value::Missing => Tag::Missing,
            Value::Tuple(items) => Tag::Tuple(items.iter().map(|v| self.classify(v)).collect()),
            Value::Seq(items) => {
                if items.is_empty() {
                    Tag::sequence(Tag::Unknown)
                } else {
                    Tag::sequence(Tag::union(items.iter().map(|v| self.classify(v))))
                }
            }
            Value::Table(table) => self.classify_table(table),
            scalar => self.convention.classify(scalar).unwrap_or(Tag::Unknown),
        }
    }

    /// Tag of a column viewed as a sequence value.
    pub fn classify_column(&self, column: &Column) -> Tag {
        Tag::sequence(self.element_tag(column))
    }

    /// The narrowest tag covering every element of the column. Columns with no
    /// present values fall back to what the native kind implies.
    pub fn element_tag(&self, column: &Column) -> Tag {
        let missing = column.has_missing();
        let present: Vec<Tag> = column
            .values()
            .iter()
            .filter(|v| !v.is_missing())
            .map(|v| self.classify(v))
            .collect();
        if !present.is_empty() {
            return Tag::union(present).with_missing(missing);
        }
        match self.convention.classify_native(column.native_type().kind) {
            Some(tag) => tag.with_missing(missing),
            None if missing => Tag::Missing,
            None => Tag::Unknown,
        }
    }

    /// `Table` over the union of its columns' sequence tags. Malformed tables
    /// are `Unknown`.
    pub fn classify_table<T: Table + ?Sized>(&self, table: &T) -> Tag {
        match table.columns() {
            Ok(columns) => Tag::table_of(columns.into_iter().map(|(_, c)| self.element_tag(c))),
            Err(_) => Tag::Unknown,
        }
    }
}
