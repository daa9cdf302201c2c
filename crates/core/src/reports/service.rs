//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{BudgetId, or_zero, saturating_sum};

use super::types::{BudgetReport, ReportSection, UNCATEGORIZED};
use crate::budget::service::BudgetService;
use crate::budget::types::{AppliedTax, BudgetLineItem, BudgetType};

/// Service for building budget reports.
pub struct ReportService;

impl ReportService {
    /// Groups rows by category and attaches the table totals.
    ///
    /// Sections keep the order in which their category first appears. Taxes
    /// are only carried for income tables.
    #[must_use]
    pub fn build(
        budget_id: &BudgetId,
        title: &str,
        budget_type: BudgetType,
        items: &[BudgetLineItem],
        taxes: &[AppliedTax],
        generated_on: NaiveDate,
    ) -> BudgetReport {
        let mut sections: Vec<ReportSection> = Vec::new();
        for item in items {
            let category = match item.category.trim() {
                "" => UNCATEGORIZED,
                name => name,
            };
            let total = or_zero(item.total_amount);
            match sections.iter_mut().find(|s| s.category == category) {
                Some(section) => {
                    section.subtotal = section.subtotal.saturating_add(total);
                    section.rows.push(item.clone());
                }
                None => sections.push(ReportSection {
                    category: category.to_string(),
                    rows: vec![item.clone()],
                    subtotal: total,
                }),
            }
        }

        let taxes = if budget_type.is_income() { taxes } else { &[] };

        BudgetReport {
            budget_id: budget_id.clone(),
            title: title.to_string(),
            budget_type,
            generated_on,
            sections,
            totals: BudgetService::totals(items, taxes),
        }
    }

    /// Download name, e.g. `Budget_Report_b-1_2024-07-01.pdf`.
    #[must_use]
    pub fn file_name(report: &BudgetReport) -> String {
        format!(
            "Budget_Report_{}_{}.pdf",
            report.budget_id,
            report.generated_on.format("%Y-%m-%d")
        )
    }

    /// Sum of section subtotals. Matches the grand total.
    #[must_use]
    pub fn sections_total(report: &BudgetReport) -> Decimal {
        saturating_sum(report.sections.iter().map(|s| s.subtotal))
    }
}
