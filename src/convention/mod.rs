//! Conventions: swappable strategies mapping native value shapes to tags and
//! tags to conversion procedures.
//!
//! The classifier only asks a convention about scalar-shaped values (numbers,
//! text, dates, categorical values, images). Missing markers, tuples,
//! sequences and tables are composed by the classifier itself so every
//! convention shares the same composition rules.

pub use self::baseline::BaselineConvention;
pub use self::custom::{ClassifyFn, CoerceFn, CustomConvention};
pub use self::registry::{
    activate_convention, current_convention, register_convention, reset_convention,
    ConventionRegistry, DEFAULT_REGISTRY,
};

use crate::coercion::CoercionOptions;
use crate::error::Result;
use crate::store::{Column, NativeKind, Value};
use crate::type_system::Tag;

/// A named classification and coercion strategy.
pub trait Convention: Send + Sync {
    fn name(&self) -> &str;

    /// Tag for a scalar-shaped value, or `None` when no rule matches its shape.
    fn classify(&self, value: &Value) -> Option<Tag>;

    /// Element tag implied by a column's native kind alone. Used for empty and
    /// all-missing columns whose values carry no shape to classify.
    fn classify_native(&self, _kind: NativeKind) -> Option<Tag> {
        None
    }

    /// Converts a column so its element tag conforms to `target`. Missing
    /// values must come back in the same positions.
    fn coerce(&self, column: &Column, target: &Tag, options: &CoercionOptions) -> Result<Column>;
}

// --- MODULE DECLARATIONS ---
mod baseline;
mod custom;
mod registry;
