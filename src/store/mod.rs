//! Native data: values, columns and the table interface.

pub use self::table::{Column, ColumnTable, Table};
pub use self::types::{
    CategoricalPool, CategoricalValue, ColorModel, ImageArray, NativeKind, NativeType, Value,
};
pub(crate) use self::types::ScalarKey;

mod table;
mod types;
