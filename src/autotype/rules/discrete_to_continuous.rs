//! Rule treating integer-valued columns as continuous measurements.
use crate::autotype::AutotypeConfig;
use crate::store::{Column, NativeKind};
use crate::type_system::Tag;

pub(crate) fn suggest(
    _column: &Column,
    _native: NativeKind,
    current: &Tag,
    _config: &AutotypeConfig,
) -> Option<Tag> {
    match current.nonmissing()? {
        Tag::Count => Some(Tag::Continuous.with_missing(current.has_missing())),
        _ => None,
    }
}
