use super::Classifier;
use crate::convention::ConventionRegistry;
use crate::error::{Result, ScitypeError};
use crate::store::{NativeType, Table, Value};
use crate::type_system::Tag;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One row of a schema: a column's name, native type and element scitype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    pub native: NativeType,
    pub tag: Tag,
}

/// Per-column summary of a table, in table column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
    nrows: usize,
}

impl Schema {
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn native_types(&self) -> Vec<NativeType> {
        self.columns.iter().map(|c| c.native).collect()
    }

    pub fn tags(&self) -> Vec<&Tag> {
        self.columns.iter().map(|c| &c.tag).collect()
    }

    pub fn column(&self, name: &str) -> Option<&SchemaColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "nrows": self.nrows,
            "columns": self.columns.iter().map(|c| serde_json::json!({
                "name": c.name,
                "native": c.native.to_string(),
                "scitype": c.tag.to_string(),
            })).collect::<Vec<_>>(),
        })
    }
}

/// Builds the schema of a table under the registry's current convention.
pub fn build_schema<T: Table + ?Sized>(table: &T, registry: &ConventionRegistry) -> Result<Schema> {
    let classifier = Classifier::new(registry);
    let columns = table
        .columns()?
        .into_iter()
        .map(|(name, column)| {
            let tag = classifier.element_tag(column);
            trace!(column = %name, scitype = %tag, "classified column");
            SchemaColumn {
                name,
                native: column.native_type(),
                tag,
            }
        })
        .collect();
    Ok(Schema {
        columns,
        nrows: table.nrows(),
    })
}

/// Schema of a value that must be a table.
pub fn schema_of(value: &Value, registry: &ConventionRegistry) -> Result<Schema> {
    match value {
        Value::Table(table) => build_schema(table, registry),
        other => Err(ScitypeError::NotATable(format!(
            "cannot build a schema for {}",
            other.native_kind().name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Column, ColumnTable, NativeKind};

    fn people() -> ColumnTable {
        ColumnTable::new(vec![
            ("name".into(), Column::new(vec![Value::from("ann"), Value::from("bo")])),
            ("height".into(), Column::new(vec![Value::Float(1.7), Value::Missing])),
            ("kids".into(), Column::new(vec![Value::Int(0), Value::Int(2)])),
        ])
        .unwrap()
    }

    #[test]
    fn test_schema_rows_follow_column_order() {
        let schema = build_schema(&people(), &ConventionRegistry::new()).unwrap();
        assert_eq!(schema.names(), vec!["name", "height", "kids"]);
        assert_eq!(schema.nrows(), 2);
        assert_eq!(
            schema.tags(),
            vec![
                &Tag::Textual,
                &Tag::Union(vec![Tag::Missing, Tag::Continuous]),
                &Tag::Count
            ]
        );
        assert_eq!(
            schema.column("height").map(|c| c.native),
            Some(NativeType::new(NativeKind::Float, true))
        );
    }

    #[test]
    fn test_schema_json() {
        let schema = build_schema(&people(), &ConventionRegistry::new()).unwrap();
        let json = schema.to_json();
        assert_eq!(json["nrows"], 2);
        assert_eq!(json["columns"][1]["native"], "Option<f64>");
        assert_eq!(json["columns"][1]["scitype"], "Union{Missing, Continuous}");
    }

    #[test]
    fn test_non_tables_are_rejected() {
        let registry = ConventionRegistry::new();
        assert!(matches!(
            schema_of(&Value::Int(3), &registry),
            Err(ScitypeError::NotATable(_))
        ));
        assert!(schema_of(&Value::Table(ColumnTable::default()), &registry).is_ok());
    }
}
