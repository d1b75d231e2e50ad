//! Baseline conversion procedures, one per target tag family.
//!
//! Every procedure walks the column once, passes missing values through
//! untouched and reports the first value it cannot convert.
use super::CoercionOptions;
use crate::error::{Result, ScitypeError};
use crate::store::{
    CategoricalPool, CategoricalValue, Column, NativeKind, NativeType, ScalarKey, Value,
};
use crate::type_system::Tag;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// Largest magnitude an `i64` can have and still widen to `f64` exactly.
const MAX_EXACT_INT: u64 = 1 << f64::MANTISSA_DIGITS;

pub(crate) fn coerce_column(column: &Column, target: &Tag, options: &CoercionOptions) -> Result<Column> {
    match target {
        Tag::Union(_) => coerce_to_union(column, target, options),
        Tag::Continuous | Tag::Infinite => to_continuous(column, target, options),
        Tag::Count => to_count(column, options),
        Tag::Finite(n) => to_finite(column, None, *n, target, options),
        Tag::Multiclass(n) => to_finite(column, Some(false), *n, target, options),
        Tag::OrderedFactor(n) => to_finite(column, Some(true), *n, target, options),
        Tag::Textual => to_textual(column, options),
        Tag::ScientificDate | Tag::ScientificTime | Tag::ScientificDateTime => {
            to_time(column, target, options)
        }
        _ => Err(ScitypeError::unsupported(column.native_type(), target)),
    }
}

fn native(kind: NativeKind, column: &Column, options: &CoercionOptions) -> NativeType {
    let nullable = column.has_missing() || (!options.tight && column.native_type().nullable);
    NativeType::new(kind, nullable)
}

/// Tries each non-missing member in order and keeps the first success.
fn coerce_to_union(column: &Column, target: &Tag, options: &CoercionOptions) -> Result<Column> {
    let Some(nonmissing) = target.nonmissing() else {
        return if column.values().iter().all(Value::is_missing) {
            Ok(column.clone())
        } else {
            Err(ScitypeError::unsupported(column.native_type(), target))
        };
    };
    let members = match nonmissing {
        Tag::Union(members) => members,
        single => return coerce_column(column, &single, options),
    };
    let mut last_err = ScitypeError::unsupported(column.native_type(), target);
    for member in &members {
        match coerce_column(column, member, options) {
            Ok(out) => return Ok(out),
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

fn map_values<F>(column: &Column, mut convert: F) -> Result<Vec<Value>>
where
    F: FnMut(usize, &Value) -> Result<Value>,
{
    column
        .values()
        .iter()
        .enumerate()
        .map(|(i, v)| if v.is_missing() { Ok(Value::Missing) } else { convert(i, v) })
        .collect()
}

fn to_continuous(column: &Column, target: &Tag, options: &CoercionOptions) -> Result<Column> {
    let mut from_levels = false;
    let values = map_values(column, |_, v| match v {
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Int(i) if i.unsigned_abs() <= MAX_EXACT_INT => Ok(Value::Float(*i as f64)),
        Value::Bool(b) => Ok(Value::Float(f64::from(u8::from(*b)))),
        Value::Level(c) => {
            from_levels = true;
            c.level()
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| ScitypeError::unsupported(v.native_kind().name(), target))
        }
        other => Err(ScitypeError::unsupported(other.native_kind().name(), target)),
    })?;
    if from_levels {
        warn!(target_tag = %target, "converting categorical levels to numbers");
    }
    Ok(Column::with_native(values, native(NativeKind::Float, column, options)))
}

fn to_count(column: &Column, options: &CoercionOptions) -> Result<Column> {
    let values = map_values(column, |i, v| {
        let x = match v {
            Value::Int(n) => return Ok(Value::Int(*n)),
            Value::Bool(b) => return Ok(Value::Int(i64::from(*b))),
            Value::Float(x) => *x,
            Value::Level(c) => c
                .level()
                .as_f64()
                .ok_or_else(|| ScitypeError::unsupported(v.native_kind().name(), Tag::Count))?,
            other => return Err(ScitypeError::unsupported(other.native_kind().name(), Tag::Count)),
        };
        if x.fract() != 0.0 || !x.is_finite() || x.abs() >= i64::MAX as f64 {
            return Err(ScitypeError::NonIntegralValue {
                column: String::new(),
                index: i,
                value: x,
            });
        }
        Ok(Value::Int(x as i64))
    })?;
    Ok(Column::with_native(values, native(NativeKind::Int, column, options)))
}

/// Converts to a categorical column. `ordered = None` keeps the source's
/// orderedness (unordered for non-categorical sources).
fn to_finite(
    column: &Column,
    ordered: Option<bool>,
    n: Option<usize>,
    target: &Tag,
    options: &CoercionOptions,
) -> Result<Column> {
    if let Some(pool) = shared_pool(column) {
        // Already categorical: flip the flag, keep the codes.
        if let Some(n) = n {
            if pool.nlevels() != n {
                return Err(ScitypeError::LevelCountMismatch {
                    column: String::new(),
                    expected: n,
                    found: pool.nlevels(),
                });
            }
        }
        let ordered = ordered.unwrap_or(pool.is_ordered());
        let pool = if ordered == pool.is_ordered() {
            pool
        } else {
            pool.with_ordered(ordered)
        };
        let values = map_values(column, |_, v| match v {
            Value::Level(c) => CategoricalValue::new(Arc::clone(&pool), c.code())
                .map(Value::Level)
                .ok_or_else(|| ScitypeError::unsupported(v.native_kind().name(), target)),
            other => Err(ScitypeError::unsupported(other.native_kind().name(), target)),
        })?;
        return Ok(Column::with_native(values, native(categorical_kind(ordered), column, options)));
    }

    let mut levels: Vec<Value> = Vec::new();
    let mut seen: HashSet<ScalarKey> = HashSet::new();
    for v in column.values().iter().filter(|v| !v.is_missing()) {
        let key = v
            .scalar_key()
            .ok_or_else(|| ScitypeError::unsupported(v.native_kind().name(), target))?;
        if seen.insert(key) {
            levels.push(match v {
                Value::Level(c) => c.level().clone(),
                other => other.clone(),
            });
        }
    }
    if let Some(n) = n {
        if levels.len() != n {
            return Err(ScitypeError::LevelCountMismatch {
                column: String::new(),
                expected: n,
                found: levels.len(),
            });
        }
    }
    levels.sort_by(Value::cmp_scalar);

    let codes: HashMap<ScalarKey, u32> = levels
        .iter()
        .enumerate()
        .filter_map(|(i, level)| Some((level.scalar_key()?, i as u32)))
        .collect();
    let ordered = ordered.unwrap_or(false);
    let pool = CategoricalPool::new(levels, ordered);

    let values = map_values(column, |_, v| {
        v.scalar_key()
            .and_then(|key| codes.get(&key).copied())
            .and_then(|code| CategoricalValue::new(Arc::clone(&pool), code))
            .map(Value::Level)
            .ok_or_else(|| ScitypeError::unsupported(v.native_kind().name(), target))
    })?;
    Ok(Column::with_native(values, native(categorical_kind(ordered), column, options)))
}

fn categorical_kind(ordered: bool) -> NativeKind {
    if ordered {
        NativeKind::OrderedCategorical
    } else {
        NativeKind::Categorical
    }
}

/// The pool shared by every non-missing value, if the column is purely categorical.
fn shared_pool(column: &Column) -> Option<Arc<CategoricalPool>> {
    let mut pool: Option<&Arc<CategoricalPool>> = None;
    for v in column.values().iter().filter(|v| !v.is_missing()) {
        let Value::Level(c) = v else { return None };
        match pool {
            None => pool = Some(c.pool()),
            Some(p) if Arc::ptr_eq(p, c.pool()) || **p == **c.pool() => {}
            Some(_) => return None,
        }
    }
    pool.cloned()
}

fn to_textual(column: &Column, options: &CoercionOptions) -> Result<Column> {
    let values = map_values(column, |_, v| match v {
        Value::Image(_) | Value::Tuple(_) | Value::Seq(_) | Value::Table(_) => {
            Err(ScitypeError::unsupported(v.native_kind().name(), Tag::Textual))
        }
        Value::Text(s) => Ok(Value::Text(s.clone())),
        other => Ok(Value::Text(other.to_string())),
    })?;
    Ok(Column::with_native(values, native(NativeKind::Text, column, options)))
}

/// Parses ISO 8601 text into dates and times; values of the right kind pass through.
fn to_time(column: &Column, target: &Tag, options: &CoercionOptions) -> Result<Column> {
    let kind = match target {
        Tag::ScientificDate => NativeKind::Date,
        Tag::ScientificTime => NativeKind::Time,
        _ => NativeKind::DateTime,
    };
    let values = map_values(column, |_, v| {
        if v.native_kind() == kind {
            return Ok(v.clone());
        }
        let fail = || ScitypeError::unsupported(v.native_kind().name(), target);
        let Value::Text(s) = v else { return Err(fail()) };
        let s = s.trim();
        match kind {
            NativeKind::Date => s.parse::<NaiveDate>().map(Value::Date).map_err(|_| fail()),
            NativeKind::Time => s.parse::<NaiveTime>().map(Value::Time).map_err(|_| fail()),
            _ => s.parse::<NaiveDateTime>().map(Value::DateTime).map_err(|_| fail()),
        }
    })?;
    Ok(Column::with_native(values, native(kind, column, options)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn opts() -> CoercionOptions {
        CoercionOptions::default()
    }

    fn ints(xs: &[i64]) -> Column {
        Column::new(xs.iter().map(|&x| Value::Int(x)).collect())
    }

    #[test]
    fn test_int_to_continuous_widens() {
        let col = Column::new(vec![Value::Int(1), Value::Missing, Value::Int(3)]);
        let out = coerce_column(&col, &Tag::Continuous, &opts()).unwrap();
        assert_eq!(out.values(), &[Value::Float(1.0), Value::Missing, Value::Float(3.0)]);
        assert_eq!(out.native_type(), NativeType::new(NativeKind::Float, true));
    }

    #[test]
    fn test_huge_int_is_not_widened_lossily() {
        let col = ints(&[i64::MAX]);
        assert!(matches!(
            coerce_column(&col, &Tag::Continuous, &opts()),
            Err(ScitypeError::UnsupportedCoercion { .. })
        ));
    }

    #[rstest]
    #[case(vec![Value::Float(1.0), Value::Float(2.0)], true)]
    #[case(vec![Value::Float(1.0), Value::Float(2.5)], false)]
    #[case(vec![Value::Float(f64::NAN)], false)]
    fn test_float_to_count(#[case] values: Vec<Value>, #[case] ok: bool) {
        let out = coerce_column(&Column::new(values), &Tag::Count, &opts());
        assert_eq!(out.is_ok(), ok);
        if let Err(e) = out {
            assert!(matches!(e, ScitypeError::NonIntegralValue { .. }));
        }
    }

    #[test]
    fn test_non_integral_reports_row() {
        let col = Column::new(vec![Value::Float(1.0), Value::Missing, Value::Float(2.5)]);
        assert_eq!(
            coerce_column(&col, &Tag::Count, &opts()),
            Err(ScitypeError::NonIntegralValue {
                column: String::new(),
                index: 2,
                value: 2.5
            })
        );
    }

    #[test]
    fn test_to_finite_sorts_levels_and_checks_count() {
        let col = Column::new(vec![
            Value::from("b"),
            Value::Missing,
            Value::from("a"),
            Value::from("b"),
        ]);
        let out = coerce_column(&col, &Tag::Multiclass(None), &opts()).unwrap();
        let Value::Level(first) = &out.values()[0] else { panic!("not categorical") };
        assert_eq!(first.levels(), &[Value::from("a"), Value::from("b")]);
        assert_eq!(first.code(), 1);
        assert!(out.values()[1].is_missing());

        assert_eq!(
            coerce_column(&col, &Tag::Multiclass(Some(3)), &opts()),
            Err(ScitypeError::LevelCountMismatch {
                column: String::new(),
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_orderedness_flip_keeps_codes() {
        let col = ints(&[3, 1, 2, 3]);
        let unordered = coerce_column(&col, &Tag::Multiclass(Some(3)), &opts()).unwrap();
        let ordered = coerce_column(&unordered, &Tag::OrderedFactor(None), &opts()).unwrap();
        let codes = |c: &Column| -> Vec<u32> {
            c.values()
                .iter()
                .filter_map(|v| match v {
                    Value::Level(l) => Some(l.code()),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(codes(&unordered), codes(&ordered));
        assert_eq!(ordered.native_type().kind, NativeKind::OrderedCategorical);
        // Finite keeps whatever orderedness the column already has.
        let kept = coerce_column(&ordered, &Tag::Finite(None), &opts()).unwrap();
        assert_eq!(kept.native_type().kind, NativeKind::OrderedCategorical);
    }

    #[test]
    fn test_numeric_levels_back_to_count() {
        let col = ints(&[10, 20, 10]);
        let cat = coerce_column(&col, &Tag::OrderedFactor(None), &opts()).unwrap();
        let back = coerce_column(&cat, &Tag::Count, &opts()).unwrap();
        assert_eq!(back.values(), col.values());
    }

    #[test]
    fn test_text_levels_to_continuous_fails() {
        let col = Column::new(vec![Value::from("x")]);
        let cat = coerce_column(&col, &Tag::Multiclass(None), &opts()).unwrap();
        assert!(coerce_column(&cat, &Tag::Continuous, &opts()).is_err());
    }

    #[test]
    fn test_textual_and_time() {
        let col = Column::new(vec![Value::from("2024-03-01"), Value::Missing]);
        let dates = coerce_column(&col, &Tag::ScientificDate, &opts()).unwrap();
        assert_eq!(dates.native_type().kind, NativeKind::Date);
        let text = coerce_column(&dates, &Tag::Textual, &opts()).unwrap();
        assert_eq!(text.values()[0], Value::from("2024-03-01"));
        assert!(coerce_column(&Column::new(vec![Value::from("soon")]), &Tag::ScientificDate, &opts()).is_err());
    }

    #[test]
    fn test_union_target_tries_members() {
        let col = Column::new(vec![Value::Int(1), Value::Missing]);
        let target = Tag::union([Tag::Missing, Tag::Continuous]);
        let out = coerce_column(&col, &target, &opts()).unwrap();
        assert_eq!(out.native_type().kind, NativeKind::Float);
    }

    #[test]
    fn test_tight_drops_nullability() {
        let col = Column::with_native(vec![Value::Int(1)], NativeType::new(NativeKind::Int, true));
        let loose = coerce_column(&col, &Tag::Continuous, &opts()).unwrap();
        assert!(loose.native_type().nullable);
        let tight = coerce_column(&col, &Tag::Continuous, &CoercionOptions { tight: true }).unwrap();
        assert!(!tight.native_type().nullable);
    }

    #[test]
    fn test_structural_targets_are_unsupported() {
        let col = ints(&[1]);
        for target in [Tag::Unknown, Tag::GrayImage(None), Tag::sequence(Tag::Count)] {
            assert!(matches!(
                coerce_column(&col, &target, &opts()),
                Err(ScitypeError::UnsupportedCoercion { .. })
            ));
        }
    }
}
