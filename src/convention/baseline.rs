//! The default convention, registered in every registry.
use super::Convention;
use crate::coercion::{rules, CoercionOptions};
use crate::error::Result;
use crate::store::{ColorModel, Column, NativeKind, Value};
use crate::type_system::Tag;

pub const BASELINE_NAME: &str = "baseline";

/// Integers and booleans are counts, floats are continuous, strings are
/// textual, categorical values are finite with their pool's level count and
/// images carry their dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineConvention;

impl Convention for BaselineConvention {
    fn name(&self) -> &str {
        BASELINE_NAME
    }

    fn classify(&self, value: &Value) -> Option<Tag> {
        match value {
            Value::Level(c) => {
                let n = Some(c.levels().len());
                Some(if c.is_ordered() {
                    Tag::OrderedFactor(n)
                } else {
                    Tag::Multiclass(n)
                })
            }
            Value::Image(img) => Some(match img.color() {
                ColorModel::Gray => Tag::GrayImage(Some(img.dims())),
                ColorModel::Rgb => Tag::ColorImage(Some(img.dims())),
            }),
            other => self.classify_native(other.native_kind()),
        }
    }

    fn classify_native(&self, kind: NativeKind) -> Option<Tag> {
        match kind {
            NativeKind::Bool | NativeKind::Int => Some(Tag::Count),
            NativeKind::Float => Some(Tag::Continuous),
            NativeKind::Text => Some(Tag::Textual),
            NativeKind::Date => Some(Tag::ScientificDate),
            NativeKind::Time => Some(Tag::ScientificTime),
            NativeKind::DateTime => Some(Tag::ScientificDateTime),
            _ => None,
        }
    }

    fn coerce(&self, column: &Column, target: &Tag, options: &CoercionOptions) -> Result<Column> {
        rules::coerce_column(column, target, options)
    }
}
