//! Autotype: heuristic scitype suggestions for table columns.

pub use self::checker::{AutoTyper, RulePipeline};
pub use self::config::AutotypeConfig;
pub use self::rules::Rule;

// --- MODULE DECLARATIONS ---
mod checker;
mod config;
mod rules;
