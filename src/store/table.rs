//! The tabular data interface consumed by the schema builder, the coercion
//! engine and autotype, plus a column-major implementation of it.
use super::types::{NativeType, ScalarKey, Value};
use crate::error::{Result, ScitypeError};
use std::collections::HashSet;

/// What any tabular data library must provide.
pub trait Table {
    /// Column names in table order.
    fn column_names(&self) -> Vec<String>;

    fn column(&self, name: &str) -> Option<&Column>;

    fn nrows(&self) -> usize;

    /// Builds a table of the same implementation from `(name, column)` pairs.
    fn rebuild(&self, columns: Vec<(String, Column)>) -> Result<Self>
    where
        Self: Sized;

    fn ncols(&self) -> usize {
        self.column_names().len()
    }

    /// Columns in table order. Fails when a listed name has no column or a
    /// column's length disagrees with `nrows`.
    fn columns(&self) -> Result<Vec<(String, &Column)>> {
        let nrows = self.nrows();
        self.column_names()
            .into_iter()
            .map(|name| {
                let column = self
                    .column(&name)
                    .ok_or_else(|| ScitypeError::NotATable(format!("column '{}' is listed but absent", name)))?;
                if column.len() != nrows {
                    return Err(ScitypeError::NotATable(format!(
                        "column '{}' has {} rows, table has {}",
                        name,
                        column.len(),
                        nrows
                    )));
                }
                Ok((name, column))
            })
            .collect()
    }
}

/// A column of native values with its native type.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    values: Vec<Value>,
    native: NativeType,
}

impl Column {
    /// Infers the native type from the values.
    pub fn new(values: Vec<Value>) -> Self {
        let native = NativeType::of_values(&values);
        Self { values, native }
    }

    /// Declares the native type explicitly, e.g. for empty or all-missing columns.
    pub fn with_native(values: Vec<Value>, native: NativeType) -> Self {
        Self { values, native }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn native_type(&self) -> NativeType {
        self.native
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    pub fn missing_positions(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_missing())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }

    /// Number of distinct non-missing scalar values. Categorical values count
    /// by their level.
    pub fn distinct_count(&self) -> usize {
        self.values
            .iter()
            .filter_map(Value::scalar_key)
            .collect::<HashSet<ScalarKey>>()
            .len()
    }
}

impl From<Vec<Value>> for Column {
    fn from(values: Vec<Value>) -> Self {
        Column::new(values)
    }
}

impl FromIterator<Value> for Column {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Column::new(iter.into_iter().collect())
    }
}

/// Column-major table with unique column names and equal column lengths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnTable {
    names: Vec<String>,
    columns: Vec<Column>,
    nrows: usize,
}

impl ColumnTable {
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        let nrows = columns.first().map_or(0, |(_, c)| c.len());
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());

        for (name, column) in columns {
            if !seen.insert(name.clone()) {
                return Err(ScitypeError::NotATable(format!("duplicate column name '{}'", name)));
            }
            if column.len() != nrows {
                return Err(ScitypeError::NotATable(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    column.len(),
                    nrows
                )));
            }
            names.push(name);
            cols.push(column);
        }

        Ok(Self {
            names,
            columns: cols,
            nrows,
        })
    }

    /// Builds a table from a JSON object whose members are equal-length arrays.
    pub fn from_json_columns(json: &serde_json::Value) -> Result<Self> {
        let map = json
            .as_object()
            .ok_or_else(|| ScitypeError::NotATable("expected a JSON object of arrays".into()))?;
        let columns = map
            .iter()
            .map(|(name, member)| {
                let items = member.as_array().ok_or_else(|| {
                    ScitypeError::NotATable(format!("member '{}' is not an array", name))
                })?;
                Ok((name.clone(), items.iter().map(Value::from_json).collect::<Column>()))
            })
            .collect::<Result<Vec<(String, Column)>>>()?;
        Self::new(columns)
    }

    pub fn get(&self, index: usize) -> Option<(&str, &Column)> {
        Some((self.names.get(index)?.as_str(), self.columns.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }
}

impl Table for ColumnTable {
    fn column_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    fn nrows(&self) -> usize {
        self.nrows
    }

    fn rebuild(&self, columns: Vec<(String, Column)>) -> Result<Self> {
        ColumnTable::new(columns)
    }

    fn ncols(&self) -> usize {
        self.names.len()
    }

    /// Names and columns are paired and length-checked at construction.
    fn columns(&self) -> Result<Vec<(String, &Column)>> {
        Ok(self.names.iter().cloned().zip(self.columns.iter()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NativeKind;
    use serde_json::json;

    fn col(values: Vec<Value>) -> Column {
        Column::new(values)
    }

    #[test]
    fn test_new_rejects_ragged_and_duplicate_columns() {
        let ragged = ColumnTable::new(vec![
            ("a".into(), col(vec![Value::Int(1)])),
            ("b".into(), col(vec![Value::Int(1), Value::Int(2)])),
        ]);
        assert!(matches!(ragged, Err(ScitypeError::NotATable(_))));

        let dup = ColumnTable::new(vec![
            ("a".into(), col(vec![Value::Int(1)])),
            ("a".into(), col(vec![Value::Int(2)])),
        ]);
        assert!(matches!(dup, Err(ScitypeError::NotATable(_))));
    }

    #[test]
    fn test_columns_in_order() {
        let t = ColumnTable::new(vec![
            ("z".into(), col(vec![Value::Int(1), Value::Int(2)])),
            ("a".into(), col(vec![Value::from("x"), Value::Missing])),
        ])
        .unwrap();
        assert_eq!(t.column_names(), vec!["z", "a"]);
        assert_eq!(t.nrows(), 2);
        let cols = t.columns().unwrap();
        assert_eq!(cols[1].0, "a");
        assert_eq!(cols[1].1.native_type(), NativeType::new(NativeKind::Text, true));
    }

    #[test]
    fn test_distinct_and_missing_counts() {
        let c = col(vec![
            Value::Int(1),
            Value::Missing,
            Value::Int(1),
            Value::Int(2),
            Value::Missing,
        ]);
        assert_eq!(c.distinct_count(), 2);
        assert_eq!(c.missing_count(), 2);
        assert_eq!(c.missing_positions(), vec![1, 4]);
    }

    #[test]
    fn test_from_json_keeps_member_order() {
        let t = ColumnTable::from_json_columns(&json!({"b": [1, 2], "a": [null, "x"]})).unwrap();
        assert_eq!(t.column_names(), vec!["b", "a"]);
        assert!(ColumnTable::from_json_columns(&json!({"b": 1})).is_err());
        assert!(ColumnTable::from_json_columns(&json!([1])).is_err());
    }
}
