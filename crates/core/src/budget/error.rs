//! Budget error types.

use rust_decimal::Decimal;
use tally_shared::AppError;
use thiserror::Error;

use super::validation::ValidationErrors;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Row index does not exist in the buffer.
    #[error("Row {index} out of range (buffer has {len} rows)")]
    RowOutOfRange {
        /// Requested index.
        index: usize,
        /// Current number of rows.
        len: usize,
    },

    /// Tax percentage outside 0..=100.
    #[error("Tax percentage {0} must be between 0 and 100")]
    PercentageOutOfRange(Decimal),

    /// Unknown line item field name.
    #[error("Unknown line item field: {0}")]
    UnknownField(String),

    /// Unknown budget type.
    #[error("Unknown budget type: {0}")]
    UnknownBudgetType(String),

    /// Form or row validation failed.
    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),
}

impl BudgetError {
    /// Create a row out of range error.
    #[must_use]
    pub const fn row_out_of_range(index: usize, len: usize) -> Self {
        Self::RowOutOfRange { index, len }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::RowOutOfRange { .. } => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
