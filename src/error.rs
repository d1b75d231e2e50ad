//! Defines the error taxonomy shared by every component.
//!
//! The classifier never fails; everything else reports one of these variants
//! synchronously. Coercion errors are raised without a column name and the
//! engine stamps the name on with [`ScitypeError::at_column`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScitypeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScitypeError {
    #[error("Unknown convention '{0}'")]
    UnknownConvention(String),

    #[error("Convention '{0}' is already registered")]
    DuplicateConvention(String),

    #[error("Not a table: {0}")]
    NotATable(String),

    #[error("Column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("Level count mismatch in column '{column}': target has {expected} levels, data has {found}")]
    LevelCountMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Non-integral value {value} at row {index} of column '{column}'")]
    NonIntegralValue {
        column: String,
        index: usize,
        value: f64,
    },

    #[error("Cannot coerce column '{column}' from {from} to {to}")]
    UnsupportedCoercion {
        column: String,
        from: String,
        to: String,
    },

    #[error("Unknown autotype rule '{0}'")]
    UnknownRule(String),
}

impl ScitypeError {
    pub(crate) fn unsupported(from: impl ToString, to: impl ToString) -> Self {
        ScitypeError::UnsupportedCoercion {
            column: String::new(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Attaches the column name to a coercion error raised on a bare column.
    pub fn at_column(mut self, name: &str) -> Self {
        match &mut self {
            ScitypeError::LevelCountMismatch { column, .. }
            | ScitypeError::NonIntegralValue { column, .. }
            | ScitypeError::UnsupportedCoercion { column, .. } => {
                *column = name.to_string();
            }
            _ => {}
        }
        self
    }

    /// True for the per-column coercion failures a caller may choose to skip.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScitypeError::LevelCountMismatch { .. }
                | ScitypeError::NonIntegralValue { .. }
                | ScitypeError::UnsupportedCoercion { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_column_stamps_coercion_errors_only() {
        let err = ScitypeError::unsupported("Textual", "Count").at_column("name");
        assert_eq!(
            err.to_string(),
            "Cannot coerce column 'name' from Textual to Count"
        );
        assert!(err.is_recoverable());

        let err = ScitypeError::UnknownRule("x".into()).at_column("name");
        assert_eq!(err, ScitypeError::UnknownRule("x".into()));
        assert!(!err.is_recoverable());
    }
}
