use super::table::{ColumnTable, Table};
use crate::type_system::Dims;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A native in-memory value. The variants are the closed set of shapes the
/// classifier dispatches on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Level(CategoricalValue),
    Image(ImageArray),
    Tuple(Vec<Value>),
    Seq(Vec<Value>),
    Table(ColumnTable),
}

/// Storage kind of a value, independent of any scientific interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeKind {
    Missing,
    Bool,
    Int,
    Float,
    Text,
    Date,
    Time,
    DateTime,
    Categorical,
    OrderedCategorical,
    Image,
    Tuple,
    Sequence,
    Table,
    Mixed,
}

impl NativeKind {
    pub fn name(self) -> &'static str {
        match self {
            NativeKind::Missing => "Missing",
            NativeKind::Bool => "bool",
            NativeKind::Int => "i64",
            NativeKind::Float => "f64",
            NativeKind::Text => "String",
            NativeKind::Date => "NaiveDate",
            NativeKind::Time => "NaiveTime",
            NativeKind::DateTime => "NaiveDateTime",
            NativeKind::Categorical => "Categorical",
            NativeKind::OrderedCategorical => "OrderedCategorical",
            NativeKind::Image => "Image",
            NativeKind::Tuple => "Tuple",
            NativeKind::Sequence => "Vec",
            NativeKind::Table => "Table",
            NativeKind::Mixed => "Any",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, NativeKind::Bool | NativeKind::Int | NativeKind::Float)
    }
}

/// The native representation of a column: element kind plus whether missing
/// values may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeType {
    pub kind: NativeKind,
    pub nullable: bool,
}

impl NativeType {
    pub fn new(kind: NativeKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    /// Infers the native type of a slice of values. Mixed non-missing kinds
    /// collapse to `Mixed`; a slice of only missing values is `Missing`.
    pub fn of_values(values: &[Value]) -> Self {
        let nullable = values.iter().any(Value::is_missing);
        let mut kinds = values
            .iter()
            .filter(|v| !v.is_missing())
            .map(Value::native_kind);
        let kind = match kinds.next() {
            None => NativeKind::Missing,
            Some(first) => {
                if kinds.all(|k| k == first) {
                    first
                } else {
                    NativeKind::Mixed
                }
            }
        };
        Self { kind, nullable }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable && self.kind != NativeKind::Missing {
            write!(f, "Option<{}>", self.kind.name())
        } else {
            f.write_str(self.kind.name())
        }
    }
}

/// Shared level set of a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalPool {
    levels: Vec<Value>,
    ordered: bool,
}

impl CategoricalPool {
    pub fn new(levels: Vec<Value>, ordered: bool) -> Arc<Self> {
        Arc::new(Self { levels, ordered })
    }

    pub fn levels(&self) -> &[Value] {
        &self.levels
    }

    pub fn nlevels(&self) -> usize {
        self.levels.len()
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Same levels with a different orderedness flag.
    pub fn with_ordered(&self, ordered: bool) -> Arc<Self> {
        Arc::new(Self {
            levels: self.levels.clone(),
            ordered,
        })
    }
}

/// One element of a categorical column: a code into a shared pool.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalValue {
    pool: Arc<CategoricalPool>,
    code: u32,
}

impl CategoricalValue {
    /// Returns `None` when `code` is outside the pool.
    pub fn new(pool: Arc<CategoricalPool>, code: u32) -> Option<Self> {
        if (code as usize) < pool.nlevels() {
            Some(Self { pool, code })
        } else {
            None
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn pool(&self) -> &Arc<CategoricalPool> {
        &self.pool
    }

    pub fn level(&self) -> &Value {
        &self.pool.levels[self.code as usize]
    }

    pub fn levels(&self) -> &[Value] {
        self.pool.levels()
    }

    pub fn is_ordered(&self) -> bool {
        self.pool.ordered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorModel {
    Gray,
    Rgb,
}

impl ColorModel {
    pub fn channels(self) -> usize {
        match self {
            ColorModel::Gray => 1,
            ColorModel::Rgb => 3,
        }
    }
}

/// A two-dimensional image with row-major pixel intensities.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArray {
    dims: Dims,
    color: ColorModel,
    pixels: Arc<[f32]>,
}

impl ImageArray {
    /// Returns `None` when the pixel buffer does not match the dimensions.
    pub fn new(dims: Dims, color: ColorModel, pixels: Vec<f32>) -> Option<Self> {
        if pixels.len() != dims.width * dims.height * color.channels() {
            return None;
        }
        Some(Self {
            dims,
            color,
            pixels: pixels.into(),
        })
    }

    pub fn blank(dims: Dims, color: ColorModel) -> Self {
        Self {
            dims,
            color,
            pixels: vec![0.0; dims.width * dims.height * color.channels()].into(),
        }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn color(&self) -> ColorModel {
        self.color
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// Hashable identity of a scalar, used for distinct counting and level lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ScalarKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn native_kind(&self) -> NativeKind {
        match self {
            Value::Missing => NativeKind::Missing,
            Value::Bool(_) => NativeKind::Bool,
            Value::Int(_) => NativeKind::Int,
            Value::Float(_) => NativeKind::Float,
            Value::Text(_) => NativeKind::Text,
            Value::Date(_) => NativeKind::Date,
            Value::Time(_) => NativeKind::Time,
            Value::DateTime(_) => NativeKind::DateTime,
            Value::Level(c) if c.is_ordered() => NativeKind::OrderedCategorical,
            Value::Level(_) => NativeKind::Categorical,
            Value::Image(_) => NativeKind::Image,
            Value::Tuple(_) => NativeKind::Tuple,
            Value::Seq(_) => NativeKind::Sequence,
            Value::Table(_) => NativeKind::Table,
        }
    }

    /// Numeric view of a number or boolean; categorical values expose their level.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            Value::Level(c) => c.level().as_f64(),
            _ => None,
        }
    }

    pub(crate) fn scalar_key(&self) -> Option<ScalarKey> {
        Some(match self {
            Value::Bool(b) => ScalarKey::Bool(*b),
            Value::Int(i) => ScalarKey::Int(*i),
            Value::Float(x) => {
                // -0.0 == 0.0 and every NaN is the same level.
                let canonical = if *x == 0.0 {
                    0.0
                } else if x.is_nan() {
                    f64::NAN
                } else {
                    *x
                };
                ScalarKey::Float(canonical.to_bits())
            }
            Value::Text(s) => ScalarKey::Text(s.clone()),
            Value::Date(d) => ScalarKey::Date(*d),
            Value::Time(t) => ScalarKey::Time(*t),
            Value::DateTime(dt) => ScalarKey::DateTime(*dt),
            Value::Level(c) => return c.level().scalar_key(),
            _ => return None,
        })
    }

    fn scalar_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Text(_) => 2,
            Value::Date(_) => 3,
            Value::Time(_) => 4,
            Value::DateTime(_) => 5,
            _ => 6,
        }
    }

    /// Total order over scalars: booleans, then numbers (numerically), text,
    /// dates, times and date-times. Non-scalars sort last and compare equal.
    pub fn cmp_scalar(&self, other: &Value) -> Ordering {
        if let Value::Level(c) = self {
            return c.level().cmp_scalar(other);
        }
        if let Value::Level(c) = other {
            return self.cmp_scalar(c.level());
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let (a, b) = (self.as_f64().unwrap_or(f64::NAN), other.as_f64().unwrap_or(f64::NAN));
                a.total_cmp(&b)
            }
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Time(a), Value::Time(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            _ => self.scalar_rank().cmp(&other.scalar_rank()),
        }
    }

    /// Converts JSON into native values. Objects become tables when every
    /// member is an array of equal length, and tuples otherwise.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::Seq(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => match ColumnTable::from_json_columns(json) {
                Ok(table) => Value::Table(table),
                Err(_) => Value::Tuple(map.values().map(Value::from_json).collect()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("missing"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::Level(c) => write!(f, "{}", c.level()),
            Value::Image(img) => write!(f, "Image({}x{})", img.dims.width, img.dims.height),
            Value::Tuple(items) => write!(f, "Tuple(len={})", items.len()),
            Value::Seq(items) => write!(f, "Vec(len={})", items.len()),
            Value::Table(t) => write!(f, "Table({} columns)", t.ncols()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}
