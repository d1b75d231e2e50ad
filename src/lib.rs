// Crate root: scientific-type tags for in-memory values and tables.
// The top-level helpers below run against the process-wide convention
// registry; components that need isolation take a `ConventionRegistry`.
// With the `python` feature this file also defines the `_core` Python module.

pub mod analysis;
pub mod autotype;
pub mod coercion;
pub mod convention;
pub mod display;
pub mod error;
pub mod store;
pub mod type_system;

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use crate::analysis::{Classifier, Schema, SchemaColumn};
pub use crate::autotype::{AutoTyper, AutotypeConfig, Rule};
pub use crate::coercion::{Coercer, CoercionOptions, CoercionTarget, PartialCoercion, TagMap};
pub use crate::convention::{
    activate_convention, current_convention, register_convention, reset_convention, Convention,
    ConventionRegistry, CustomConvention, DEFAULT_REGISTRY,
};
pub use crate::error::{Result, ScitypeError};
pub use crate::store::{Column, ColumnTable, NativeKind, NativeType, Table, Value};
pub use crate::type_system::{Dims, Tag, TagKind};

/// Scitype of any value under the active convention. Never fails.
pub fn scitype(value: &Value) -> Tag {
    Classifier::new(&DEFAULT_REGISTRY).classify(value)
}

/// Element scitype of a column, without the `Sequence` wrapper.
pub fn elscitype(column: &Column) -> Tag {
    Classifier::new(&DEFAULT_REGISTRY).element_tag(column)
}

/// Whether `a` conforms to `b` in the scitype hierarchy.
pub fn is_subtype(a: &Tag, b: &Tag) -> bool {
    a.is_subtype(b)
}

/// ASCII rendering of the scitype hierarchy.
pub fn tree() -> String {
    display::format_tree()
}

pub fn schema<T: Table + ?Sized>(table: &T) -> Result<Schema> {
    analysis::build_schema(table, &DEFAULT_REGISTRY)
}

pub fn coerce(value: &Value, target: &CoercionTarget) -> Result<Value> {
    Coercer::new(&DEFAULT_REGISTRY).coerce(value, target)
}

pub fn coerce_table<T: Table>(table: &T, mapping: &TagMap) -> Result<T> {
    Coercer::new(&DEFAULT_REGISTRY).coerce_table(table, mapping)
}

const DEFAULT_RULES: [Rule; 1] = [Rule::FewToFinite];

fn rules_or_default(rules: &[Rule]) -> &[Rule] {
    if rules.is_empty() {
        &DEFAULT_RULES
    } else {
        rules
    }
}

/// Suggested scitypes per column; an empty `rules` means few-to-finite alone.
pub fn autotype<T: Table + ?Sized>(table: &T, rules: &[Rule], only_changes: bool) -> Result<TagMap> {
    AutoTyper::new(&DEFAULT_REGISTRY).run(table, rules_or_default(rules), only_changes)
}

/// Runs autotype, then coerces every column with a changed suggestion.
pub fn autotype_and_coerce<T: Table>(table: &T, rules: &[Rule], options: CoercionOptions) -> Result<T> {
    AutoTyper::new(&DEFAULT_REGISTRY).run_and_coerce(&DEFAULT_REGISTRY, table, rules_or_default(rules), options)
}

// --- Module Definition ---
/// Defines the `_core` Python module.
#[cfg(feature = "python")]
#[pyo3::pymodule]
fn _core(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    use pyo3::prelude::*;
    use crate::bindings::python;

    m.add_function(wrap_pyfunction!(python::scitype, m)?)?;
    m.add_function(wrap_pyfunction!(python::schema, m)?)?;
    m.add_function(wrap_pyfunction!(python::autotype, m)?)?;
    m.add_function(wrap_pyfunction!(python::coerce, m)?)?;
    m.add_function(wrap_pyfunction!(python::is_subtype, m)?)?;
    Ok(())
}
