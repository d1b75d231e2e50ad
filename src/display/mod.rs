//! Human-readable renderings: the schema table and the hierarchy tree.

pub use self::tree::format_tree;

// --- MODULE DECLARATIONS ---
mod schema;
mod tree;
