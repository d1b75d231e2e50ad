use crate::analysis::{build_schema, Classifier};
use crate::autotype::{AutoTyper, Rule};
use crate::coercion::{Coercer, CoercionTarget, TagMap};
use crate::convention::DEFAULT_REGISTRY;
use crate::error::ScitypeError;
use crate::store::{Column, ColumnTable, Value};
use crate::type_system::Tag;
use pyo3::exceptions::{PyKeyError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyTuple};
use pyo3::IntoPyObjectExt;

fn to_py_err(e: ScitypeError) -> PyErr {
    match e {
        ScitypeError::UnknownColumn(_) => PyKeyError::new_err(e.to_string()),
        ScitypeError::NotATable(_) => PyTypeError::new_err(e.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

fn parse_tag(s: &str) -> PyResult<Tag> {
    s.parse::<Tag>().map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Python object -> native value. Dicts of lists become tables.
fn to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Missing);
    }
    if let Ok(b) = obj.extract::<bool>() {
        return Ok(Value::Bool(b));
    }
    if let Ok(i) = obj.extract::<i64>() {
        return Ok(Value::Int(i));
    }
    if let Ok(x) = obj.extract::<f64>() {
        return Ok(Value::Float(x));
    }
    if let Ok(s) = obj.extract::<String>() {
        return Ok(Value::Text(s));
    }
    if let Ok(dict) = obj.extract::<Bound<'_, PyDict>>() {
        return to_table(&dict).map(Value::Table);
    }
    let is_tuple = obj.is_instance_of::<PyTuple>();
    if let Ok(items) = obj.extract::<Vec<Bound<'_, PyAny>>>() {
        let values = items.iter().map(to_value).collect::<PyResult<Vec<_>>>()?;
        return Ok(if is_tuple { Value::Tuple(values) } else { Value::Seq(values) });
    }
    Err(PyTypeError::new_err(format!(
        "unsupported Python type '{}'",
        obj.get_type().name()?
    )))
}

fn to_table(dict: &Bound<'_, PyDict>) -> PyResult<ColumnTable> {
    let mut columns = Vec::with_capacity(dict.len());
    for (key, member) in dict.iter() {
        let name: String = key.extract()?;
        let items: Vec<Bound<'_, PyAny>> = member.extract()?;
        let column = items.iter().map(to_value).collect::<PyResult<Column>>()?;
        columns.push((name, column));
    }
    ColumnTable::new(columns).map_err(to_py_err)
}

/// Native value -> Python object. Dates and categorical levels come back as
/// their plain values; tables come back as dicts of lists.
fn from_value(py: Python<'_>, value: &Value) -> PyResult<Py<PyAny>> {
    match value {
        Value::Missing => Ok(py.None()),
        Value::Bool(b) => b.into_py_any(py),
        Value::Int(i) => i.into_py_any(py),
        Value::Float(x) => x.into_py_any(py),
        Value::Text(s) => s.into_py_any(py),
        Value::Level(c) => from_value(py, c.level()),
        Value::Tuple(items) | Value::Seq(items) => items
            .iter()
            .map(|v| from_value(py, v))
            .collect::<PyResult<Vec<_>>>()?
            .into_py_any(py),
        Value::Table(table) => {
            let dict = PyDict::new(py);
            for (name, column) in table.iter() {
                let items = column
                    .values()
                    .iter()
                    .map(|v| from_value(py, v))
                    .collect::<PyResult<Vec<_>>>()?;
                dict.set_item(name, items)?;
            }
            dict.into_py_any(py)
        }
        other => other.to_string().into_py_any(py),
    }
}

/// Scitype of a Python object under the active convention.
#[pyfunction]
pub fn scitype(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    let value = to_value(obj)?;
    Ok(Classifier::new(&DEFAULT_REGISTRY).classify(&value).to_string())
}

/// `(name, native, scitype)` per column of a dict of lists.
#[pyfunction]
pub fn schema(table: &Bound<'_, PyDict>) -> PyResult<Vec<(String, String, String)>> {
    let table = to_table(table)?;
    let schema = build_schema(&table, &DEFAULT_REGISTRY).map_err(to_py_err)?;
    Ok(schema
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.native.to_string(), c.tag.to_string()))
        .collect())
}

#[pyfunction]
#[pyo3(signature = (table, rules = None, only_changes = false))]
pub fn autotype(
    table: &Bound<'_, PyDict>,
    rules: Option<Vec<String>>,
    only_changes: bool,
) -> PyResult<Vec<(String, String)>> {
    let pipeline = match rules {
        Some(names) => names
            .iter()
            .map(|n| n.parse::<Rule>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_py_err)?,
        None => vec![Rule::default()],
    };
    let table = to_table(table)?;
    let suggestions = AutoTyper::new(&DEFAULT_REGISTRY)
        .run(&table, &pipeline, only_changes)
        .map_err(to_py_err)?;
    Ok(suggestions.into_iter().map(|(name, tag)| (name, tag.to_string())).collect())
}

/// Coerces a scalar or list to a tag string, or a dict of lists to a dict of
/// tag strings.
#[pyfunction]
pub fn coerce(py: Python<'_>, obj: &Bound<'_, PyAny>, target: &Bound<'_, PyAny>) -> PyResult<Py<PyAny>> {
    let value = to_value(obj)?;
    let target = if let Ok(tag) = target.extract::<String>() {
        CoercionTarget::Single(parse_tag(&tag)?)
    } else {
        let mapping = target.extract::<Bound<'_, PyDict>>()?;
        let mut tags = TagMap::new();
        for (name, tag) in mapping.iter() {
            tags.insert(name.extract::<String>()?, parse_tag(&tag.extract::<String>()?)?);
        }
        CoercionTarget::Mapping(tags)
    };
    let out = Coercer::new(&DEFAULT_REGISTRY)
        .coerce(&value, &target)
        .map_err(to_py_err)?;
    from_value(py, &out)
}

#[pyfunction]
pub fn is_subtype(a: &str, b: &str) -> PyResult<bool> {
    Ok(parse_tag(a)?.is_subtype(&parse_tag(b)?))
}
