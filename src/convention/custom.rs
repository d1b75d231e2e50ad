//! Conventions assembled from closures.
use super::Convention;
use crate::coercion::CoercionOptions;
use crate::error::{Result, ScitypeError};
use crate::store::{Column, NativeKind, Value};
use crate::type_system::{Tag, TagKind};
use std::collections::HashMap;
use std::sync::Arc;

pub type ClassifyFn = Arc<dyn Fn(&Value) -> Option<Tag> + Send + Sync>;
pub type CoerceFn = Arc<dyn Fn(&Column, &Tag, &CoercionOptions) -> Result<Column> + Send + Sync>;

/// A convention built from a classify closure and per-kind coercion closures.
///
/// Shapes the closure does not recognise, and target kinds without a coercion
/// closure, are delegated to the parent convention when one is set.
pub struct CustomConvention {
    name: String,
    classify: ClassifyFn,
    coercions: HashMap<TagKind, CoerceFn>,
    parent: Option<Arc<dyn Convention>>,
}

impl CustomConvention {
    pub fn new<F>(name: impl Into<String>, classify: F) -> Self
    where
        F: Fn(&Value) -> Option<Tag> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            classify: Arc::new(classify),
            coercions: HashMap::new(),
            parent: None,
        }
    }

    /// Registers the conversion used when the target tag is of `kind`.
    pub fn with_coercion<F>(mut self, kind: TagKind, coerce: F) -> Self
    where
        F: Fn(&Column, &Tag, &CoercionOptions) -> Result<Column> + Send + Sync + 'static,
    {
        self.coercions.insert(kind, Arc::new(coerce));
        self
    }

    pub fn extending(mut self, parent: Arc<dyn Convention>) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl Convention for CustomConvention {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, value: &Value) -> Option<Tag> {
        (self.classify)(value).or_else(|| self.parent.as_ref()?.classify(value))
    }

    fn classify_native(&self, kind: NativeKind) -> Option<Tag> {
        self.parent.as_ref()?.classify_native(kind)
    }

    fn coerce(&self, column: &Column, target: &Tag, options: &CoercionOptions) -> Result<Column> {
        if let Some(rule) = target.kind().and_then(|k| self.coercions.get(&k)) {
            return rule(column, target, options);
        }
        // Union targets try this convention's rules member by member before
        // handing the whole union to the parent.
        let mut last_err = None;
        if let Tag::Union(members) = target {
            for member in members {
                let Some(rule) = member.kind().and_then(|k| self.coercions.get(&k)) else {
                    continue;
                };
                match rule(column, member, options) {
                    Ok(out) => return Ok(out),
                    Err(e) => last_err = Some(e),
                }
            }
        }
        match &self.parent {
            Some(parent) => parent.coerce(column, target, options),
            None => Err(last_err.unwrap_or_else(|| ScitypeError::unsupported(column.native_type(), target))),
        }
    }
}
