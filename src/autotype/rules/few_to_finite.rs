//! Rule reclassifying discrete or textual columns with few distinct values as finite.
use crate::autotype::AutotypeConfig;
use crate::store::{Column, NativeKind};
use crate::type_system::Tag;

/// Counts become ordered factors and text becomes classes, sized to the
/// number of distinct values. Any other forwarded tag is left alone.
pub(crate) fn suggest(
    column: &Column,
    _native: NativeKind,
    current: &Tag,
    config: &AutotypeConfig,
) -> Option<Tag> {
    let nonmissing = column.len() - column.missing_count();
    let distinct = column.distinct_count();
    if !config.has_few_distinct(distinct, nonmissing) {
        return None;
    }
    let finite = match current.nonmissing()? {
        Tag::Count => Tag::OrderedFactor(Some(distinct)),
        Tag::Textual => Tag::Multiclass(Some(distinct)),
        _ => return None,
    };
    Some(finite.with_missing(current.has_missing()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    fn repeat(levels: &[i64], rows: usize) -> Column {
        (0..rows).map(|i| Value::Int(levels[i % levels.len()])).collect()
    }

    #[test]
    fn test_counts_become_ordered() {
        let col = repeat(&[1, 2, 3, 4], 12);
        assert_eq!(
            suggest(&col, NativeKind::Int, &Tag::Count, &AutotypeConfig::default()),
            Some(Tag::OrderedFactor(Some(4)))
        );
    }

    #[test]
    fn test_keeps_missing_in_suggestion() {
        let mut values = repeat(&[1, 2], 10).into_values();
        values.push(Value::Missing);
        let col = Column::new(values);
        let current = Tag::Count.with_missing(true);
        assert_eq!(
            suggest(&col, NativeKind::Int, &current, &AutotypeConfig::default()),
            Some(Tag::Union(vec![Tag::Missing, Tag::OrderedFactor(Some(2))]))
        );
    }

    #[test]
    fn test_abstains() {
        let config = AutotypeConfig::default();
        // Too many distinct values.
        let wide = repeat(&[1, 2, 3, 4, 5, 6, 7], 14);
        assert_eq!(suggest(&wide, NativeKind::Int, &Tag::Count, &config), None);
        // Every value distinct.
        let unique = repeat(&[1, 2, 3], 3);
        assert_eq!(suggest(&unique, NativeKind::Int, &Tag::Count, &config), None);
        // Forwarded tag is no longer discrete.
        let col = repeat(&[1, 2], 10);
        assert_eq!(suggest(&col, NativeKind::Int, &Tag::Continuous, &config), None);
    }
}
