//! Budget report export.
//!
//! A report groups the rows of one budget table by category and carries the
//! same totals the editor shows. It renders to an HTML fragment or a PDF.

pub mod error;
pub mod html;
pub mod pdf;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::{BudgetReport, ReportSection, UNCATEGORIZED};

impl BudgetReport {
    /// Download file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        ReportService::file_name(self)
    }

    /// HTML fragment of the report.
    #[must_use]
    pub fn to_html(&self) -> String {
        html::render(self)
    }

    /// PDF bytes of the report.
    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        pdf::render(self)
    }
}
