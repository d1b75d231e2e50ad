//! Read-only inspection of native data: per-value classification and
//! per-table schemas.

pub use self::classifier::Classifier;
pub use self::schema::{build_schema, schema_of, Schema, SchemaColumn};

// --- MODULE DECLARATIONS ---
mod classifier;
mod schema;
