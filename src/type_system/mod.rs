//! The scientific type system.
//!
//! Tags are static: they are never created from data at runtime other than by
//! the classifier, and their relation is fixed by the hierarchy declared in
//! `hierarchy.rs`.

// Publicly export the primary components for use by other modules.
pub use self::hierarchy::{is_subtype, Hierarchy, HIERARCHY};
pub use self::parse::ParseTagError;
pub use self::tag::{Dims, Tag, TagKind};

// --- MODULE DECLARATIONS ---
mod hierarchy;
mod parse;
mod tag;
