//! Rule turning text columns into unordered classes.
use crate::autotype::AutotypeConfig;
use crate::store::{Column, NativeKind};
use crate::type_system::Tag;

/// Looks at the native representation only, so it fires even after an
/// earlier rule has reclassified the column.
pub(crate) fn suggest(
    column: &Column,
    native: NativeKind,
    current: &Tag,
    _config: &AutotypeConfig,
) -> Option<Tag> {
    if native != NativeKind::Text {
        return None;
    }
    match column.distinct_count() {
        0 => None,
        n => Some(Tag::Multiclass(Some(n)).with_missing(current.has_missing())),
    }
}
