//! Caller contract violations raised by the filter and aggregation engines.
//!
//! Load failures stay in `anyhow` with file and row context; these variants
//! are for queries that name columns the normalized table does not have, or
//! that ask for arithmetic on a text column.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The column is not part of the normalized table.
    #[error("Column '{column}' not found")]
    UnknownColumn { column: String },

    /// An aggregate or predicate needs numbers but the column holds text.
    #[error("Column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    /// Grouping was requested without any key column.
    #[error("At least one group-by column is required")]
    EmptyGroupKeys,
}

impl AnalysisError {
    pub(crate) fn unknown(column: &str) -> Self {
        AnalysisError::UnknownColumn {
            column: column.to_string(),
        }
    }

    pub(crate) fn non_numeric(column: &str) -> Self {
        AnalysisError::NonNumericColumn {
            column: column.to_string(),
        }
    }
}
