use super::{CoercionOptions, TagMap};
use crate::analysis::Classifier;
use crate::convention::{Convention, ConventionRegistry};
use crate::error::{Result, ScitypeError};
use crate::store::{Column, NativeType, Table, Value};
use crate::type_system::Tag;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// What to coerce a value to: one tag for a scalar or sequence, or a
/// column-name mapping for a table.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionTarget {
    Single(Tag),
    Mapping(TagMap),
}

impl From<Tag> for CoercionTarget {
    fn from(tag: Tag) -> Self {
        CoercionTarget::Single(tag)
    }
}

impl From<TagMap> for CoercionTarget {
    fn from(map: TagMap) -> Self {
        CoercionTarget::Mapping(map)
    }
}

/// Result of a best-effort table coercion.
#[derive(Debug, Clone)]
pub struct PartialCoercion<T> {
    /// The table with every convertible column converted and the rest unchanged.
    pub table: T,
    pub failures: Vec<(String, ScitypeError)>,
}

impl<T> PartialCoercion<T> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies the active convention's conversions and verifies their outcome.
pub struct Coercer {
    convention: Arc<dyn Convention>,
    classifier: Classifier,
    options: CoercionOptions,
}

impl Coercer {
    pub fn new(registry: &ConventionRegistry) -> Self {
        let convention = registry.current();
        Self {
            classifier: Classifier::with_convention(Arc::clone(&convention)),
            convention,
            options: CoercionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CoercionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CoercionOptions {
        self.options
    }

    /// Converts a column so its element tag conforms to `target`.
    ///
    /// Columns that already conform come back unchanged. Missing values keep
    /// their positions.
    pub fn coerce_column(&self, column: &Column, target: &Tag) -> Result<Column> {
        let current = self.classifier.element_tag(column);
        if conforms(&current, target) {
            return Ok(self.tighten(column.clone()));
        }
        // Missing values pass through every conversion, so the convention only
        // sees the non-missing part of the target.
        let request = target.nonmissing().unwrap_or_else(|| target.clone());
        let out = self.convention.coerce(column, &request, &self.options)?;

        let converted = self.classifier.element_tag(&out);
        if !conforms(&converted, target) || out.missing_positions() != column.missing_positions() {
            return Err(ScitypeError::unsupported(column.native_type(), target));
        }
        trace!(from = %current, to = %converted, "converted column");
        Ok(self.tighten(out))
    }

    /// Converts the named columns; the others pass through. Fails on the first
    /// column that cannot be converted.
    pub fn coerce_table<T: Table>(&self, table: &T, mapping: &TagMap) -> Result<T> {
        let columns = self.checked_columns(table, mapping)?;
        let converted = columns
            .into_iter()
            .map(|(name, column)| {
                let column = match mapping.get(&name) {
                    Some(target) => self.coerce_column(column, target).map_err(|e| e.at_column(&name))?,
                    None => column.clone(),
                };
                Ok((name, column))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(columns = mapping.len(), "coerced table");
        table.rebuild(converted)
    }

    /// Like [`coerce_table`](Self::coerce_table) but leaves columns that fail
    /// to convert unchanged and reports them.
    pub fn coerce_table_partial<T: Table>(&self, table: &T, mapping: &TagMap) -> Result<PartialCoercion<T>> {
        let columns = self.checked_columns(table, mapping)?;
        let mut failures = Vec::new();
        let mut converted = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            let column = match mapping.get(&name) {
                Some(target) => match self.coerce_column(column, target) {
                    Ok(out) => out,
                    Err(e) if e.is_recoverable() => {
                        debug!(column = %name, error = %e, "left column unconverted");
                        failures.push((name.clone(), e.at_column(&name)));
                        column.clone()
                    }
                    Err(e) => return Err(e.at_column(&name)),
                },
                None => column.clone(),
            };
            converted.push((name, column));
        }
        Ok(PartialCoercion {
            table: table.rebuild(converted)?,
            failures,
        })
    }

    /// Converts every column whose element tag, ignoring missing values, is a
    /// subtype of some `from`, to the `to` of the first such pair.
    pub fn coerce_table_by_pairs<T: Table>(&self, table: &T, pairs: &[(Tag, Tag)]) -> Result<T> {
        let mut mapping = TagMap::new();
        for (name, column) in table.columns()? {
            let Some(current) = self.classifier.element_tag(column).nonmissing() else {
                continue;
            };
            if let Some((_, to)) = pairs.iter().find(|(from, _)| current.is_subtype(from)) {
                mapping.insert(name, to.clone());
            }
        }
        self.coerce_table(table, &mapping)
    }

    /// Coerces an arbitrary value. Tables take a mapping; scalars and
    /// sequences take a single tag.
    pub fn coerce(&self, value: &Value, target: &CoercionTarget) -> Result<Value> {
        match (value, target) {
            (Value::Table(table), CoercionTarget::Mapping(mapping)) => {
                self.coerce_table(table, mapping).map(Value::Table)
            }
            (other, CoercionTarget::Mapping(_)) => Err(ScitypeError::NotATable(format!(
                "a column mapping needs a table, got {}",
                other.native_kind().name()
            ))),
            (Value::Table(_), CoercionTarget::Single(tag)) => Err(ScitypeError::unsupported("Table", tag)),
            (Value::Seq(items), CoercionTarget::Single(tag)) => {
                let out = self.coerce_column(&Column::new(items.clone()), tag)?;
                Ok(Value::Seq(out.into_values()))
            }
            (scalar, CoercionTarget::Single(tag)) => {
                let out = self.coerce_column(&Column::new(vec![scalar.clone()]), tag)?;
                Ok(out.into_values().into_iter().next().unwrap_or(Value::Missing))
            }
        }
    }

    fn checked_columns<'t, T: Table>(&self, table: &'t T, mapping: &TagMap) -> Result<Vec<(String, &'t Column)>> {
        let columns = table.columns()?;
        let names: HashSet<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        if let Some(unknown) = mapping.keys().find(|k| !names.contains(k.as_str())) {
            return Err(ScitypeError::UnknownColumn(unknown.clone()));
        }
        Ok(columns)
    }

    fn tighten(&self, column: Column) -> Column {
        let native = column.native_type();
        if self.options.tight && native.nullable && !column.has_missing() {
            Column::with_native(column.into_values(), NativeType::new(native.kind, false))
        } else {
            column
        }
    }
}

/// Whether a column's present values already conform to `target`.
fn conforms(element: &Tag, target: &Tag) -> bool {
    match element.nonmissing() {
        Some(present) => present.is_subtype(target),
        None => true,
    }
}
