//! Report error types.

use tally_shared::AppError;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The PDF document could not be assembled.
    #[error("Failed to render PDF: {0}")]
    Render(String),

    /// Writing the document failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Internal(err.to_string())
    }
}
