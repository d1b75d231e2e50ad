//! Coercion: converting columns and tables so their scitypes conform to targets.
//!
//! The engine decides what needs converting and checks the result; the active
//! convention supplies the conversion procedure itself.

pub use self::engine::{Coercer, CoercionTarget, PartialCoercion};

use crate::type_system::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column name to target tag.
pub type TagMap = BTreeMap<String, Tag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionOptions {
    /// Drop nullability from converted columns that end up with no missing values.
    pub tight: bool,
}

impl CoercionOptions {
    pub fn tight() -> Self {
        Self { tight: true }
    }
}

// --- MODULE DECLARATIONS ---
mod engine;
pub(crate) mod rules;
