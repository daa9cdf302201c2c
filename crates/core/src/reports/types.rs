//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::BudgetId;

use crate::budget::types::{BudgetLineItem, BudgetTotals, BudgetType};

/// Label used for rows without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Rows of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Category name.
    pub category: String,
    /// Rows in their buffer order.
    pub rows: Vec<BudgetLineItem>,
    /// Sum of row totals in this section.
    pub subtotal: Decimal,
}

/// Everything needed to print a budget table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetReport {
    /// Budget the report is for.
    pub budget_id: BudgetId,
    /// Budget title.
    pub title: String,
    /// Which table was exported.
    pub budget_type: BudgetType,
    /// Date the report was produced.
    pub generated_on: NaiveDate,
    /// Sections in order of first appearance.
    pub sections: Vec<ReportSection>,
    /// Totals for the whole table.
    pub totals: BudgetTotals,
}

impl BudgetReport {
    /// Returns true if taxes belong in the output.
    #[must_use]
    pub fn shows_taxes(&self) -> bool {
        self.budget_type.is_income() && !self.totals.tax_lines.is_empty()
    }
}
