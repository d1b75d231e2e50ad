//! Registry of conventions and the active-convention state.
use super::baseline::{BaselineConvention, BASELINE_NAME};
use super::Convention;
use crate::error::{Result, ScitypeError};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

/// Append-only set of named conventions with exactly one active at a time.
///
/// The baseline convention is always registered and is what [`current`]
/// returns until another convention is activated. Tests construct their own
/// registries; top-level helpers use [`DEFAULT_REGISTRY`].
///
/// [`current`]: ConventionRegistry::current
pub struct ConventionRegistry {
    state: RwLock<RegistryState>,
}

struct RegistryState {
    // Registration order; never shrinks.
    conventions: Vec<Arc<dyn Convention>>,
    active: Option<usize>,
}

impl ConventionRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                conventions: vec![Arc::new(BaselineConvention)],
                active: None,
            }),
        }
    }

    /// Adds a convention. Names are unique.
    pub fn register(&self, convention: Arc<dyn Convention>) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let name = convention.name().to_string();
        if state.conventions.iter().any(|c| c.name() == name) {
            return Err(ScitypeError::DuplicateConvention(name));
        }
        state.conventions.push(convention);
        debug!(convention = %name, "registered convention");
        Ok(())
    }

    /// Makes a registered convention the current one.
    pub fn activate(&self, name: &str) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let idx = state
            .conventions
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| ScitypeError::UnknownConvention(name.to_string()))?;
        state.active = Some(idx);
        debug!(convention = %name, "activated convention");
        Ok(())
    }

    /// Returns to the baseline convention.
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.active = None;
        debug!(convention = BASELINE_NAME, "reset active convention");
    }

    pub fn current(&self) -> Arc<dyn Convention> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let idx = state.active.unwrap_or(0);
        Arc::clone(&state.conventions[idx])
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Convention>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.conventions.iter().find(|c| c.name() == name).cloned()
    }

    /// Names of all registered conventions, in registration order.
    pub fn registered(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.conventions.iter().map(|c| c.name().to_string()).collect()
    }
}

impl Default for ConventionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry used by the top-level helpers.
pub static DEFAULT_REGISTRY: LazyLock<ConventionRegistry> = LazyLock::new(ConventionRegistry::new);

pub fn register_convention(convention: Arc<dyn Convention>) -> Result<()> {
    DEFAULT_REGISTRY.register(convention)
}

pub fn activate_convention(name: &str) -> Result<()> {
    DEFAULT_REGISTRY.activate(name)
}

pub fn reset_convention() {
    DEFAULT_REGISTRY.reset()
}

pub fn current_convention() -> Arc<dyn Convention> {
    DEFAULT_REGISTRY.current()
}
