//! HTML fragment for a budget report.

use std::fmt::Write as _;

use rust_decimal::Decimal;
use tally_shared::types::format_amount;

use super::types::BudgetReport;
use crate::budget::types::BudgetLineItem;

const COLUMNS: [&str; 8] = [
    "Sub-category",
    "Merchant",
    "Description",
    "Qty",
    "Units",
    "Amount",
    "Total",
    "Actual",
];

/// Escapes text for use in element content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn optional_amount(value: Option<Decimal>) -> String {
    value.map(format_amount).unwrap_or_default()
}

fn row_cells(item: &BudgetLineItem) -> [String; 8] {
    [
        item.sub_category.clone(),
        item.merchant.clone(),
        item.description.clone(),
        item.quantity.map(|q| q.to_string()).unwrap_or_default(),
        item.units.clone(),
        optional_amount(item.amount),
        optional_amount(item.total_amount),
        optional_amount(item.actual_amount),
    ]
}

/// Renders the report as a self-contained HTML fragment.
#[must_use]
pub fn render(report: &BudgetReport) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<div class=\"budget-report\"><h1>{}</h1><p>{} budget &middot; {}</p>",
        escape(&report.title),
        escape(report.budget_type.as_str()),
        report.generated_on.format("%Y-%m-%d"),
    );

    for section in &report.sections {
        let _ = write!(html, "<h2>{}</h2><table><thead><tr>", escape(&section.category));
        for column in COLUMNS {
            let _ = write!(html, "<th>{column}</th>");
        }
        html.push_str("</tr></thead><tbody>");
        for row in &section.rows {
            html.push_str("<tr>");
            for cell in row_cells(row) {
                let _ = write!(html, "<td>{}</td>", escape(&cell));
            }
            html.push_str("</tr>");
        }
        let _ = write!(
            html,
            "</tbody><tfoot><tr><td colspan=\"6\">Subtotal</td><td>{}</td><td></td></tr></tfoot></table>",
            format_amount(section.subtotal)
        );
    }

    let totals = &report.totals;
    let _ = write!(
        html,
        "<table class=\"totals\"><tr><th>Grand Total</th><td>{}</td></tr><tr><th>Total Actual</th><td>{}</td></tr>",
        format_amount(totals.grand_total),
        format_amount(totals.total_actual),
    );
    if report.shows_taxes() {
        for line in &totals.tax_lines {
            let _ = write!(
                html,
                "<tr><th>{} ({}%)</th><td>{}</td></tr>",
                escape(&line.tax.tax_name),
                line.tax.percentage.normalize(),
                format_amount(line.amount),
            );
        }
        let _ = write!(
            html,
            "<tr><th>Total Tax</th><td>{}</td></tr><tr><th>Net of Tax</th><td>{}</td></tr>",
            format_amount(totals.total_tax),
            format_amount(totals.grand_total_net_of_tax),
        );
    }
    html.push_str("</table></div>");
    html
}
