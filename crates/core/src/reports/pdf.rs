//! Text-layout PDF rendering of a budget report.
//!
//! One line per row on A4 pages in Helvetica. Long cells are clipped and
//! characters outside printable ASCII are replaced with `?`.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use rust_decimal::Decimal;
use tally_shared::types::format_amount;

use super::error::ReportError;
use super::types::BudgetReport;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const TOP: i64 = 800;
const BOTTOM: i64 = 50;
const LEFT: i64 = 40;
const LINE_GAP: i64 = 4;
const FONT: &[u8] = b"F1";

const TITLE_SIZE: i64 = 14;
const HEADING_SIZE: i64 = 11;
const BODY_SIZE: i64 = 8;

/// Column x offset and maximum characters.
const COLUMNS: [(i64, usize); 8] = [
    (LEFT, 14),
    (115, 14),
    (195, 26),
    (335, 5),
    (362, 8),
    (405, 11),
    (465, 11),
    (525, 11),
];

const HEADERS: [&str; 8] = [
    "Sub-category",
    "Merchant",
    "Description",
    "Qty",
    "Units",
    "Amount",
    "Total",
    "Actual",
];

fn clip(text: &str, max: usize) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect();
    if cleaned.chars().count() <= max {
        return cleaned;
    }
    let mut clipped: String = cleaned.chars().take(max.saturating_sub(2)).collect();
    clipped.push_str("..");
    clipped
}

fn amount(value: Option<Decimal>) -> String {
    value.map(format_amount).unwrap_or_default()
}

/// Accumulates text operations and starts a new page when one fills up.
struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: TOP,
        }
    }

    fn line(&mut self, size: i64, cells: &[(i64, String)]) {
        if self.y < BOTTOM {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = TOP;
        }
        for (x, text) in cells {
            if text.is_empty() {
                continue;
            }
            self.current.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(FONT.to_vec()), Object::Integer(size)]),
                Operation::new("Td", vec![Object::Integer(*x), Object::Integer(self.y)]),
                Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                Operation::new("ET", vec![]),
            ]);
        }
        self.y -= size + LINE_GAP;
    }

    fn text(&mut self, size: i64, text: &str) {
        self.line(size, &[(LEFT, clip(text, 90))]);
    }

    fn pair(&mut self, label: &str, value: String) {
        self.line(BODY_SIZE + 1, &[(LEFT, clip(label, 60)), (465, value)]);
    }

    fn gap(&mut self) {
        self.y -= LINE_GAP * 2;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn table_row(cells: [String; 8]) -> Vec<(i64, String)> {
    COLUMNS
        .iter()
        .zip(cells)
        .map(|(&(x, max), text)| (x, clip(&text, max)))
        .collect()
}

fn layout(report: &BudgetReport) -> Vec<Vec<Operation>> {
    let mut page = Layout::new();
    page.text(TITLE_SIZE, &report.title);
    page.text(
        BODY_SIZE + 1,
        &format!(
            "{} budget {} - generated {}",
            report.budget_type,
            report.budget_id,
            report.generated_on.format("%Y-%m-%d")
        ),
    );
    page.gap();

    for section in &report.sections {
        page.text(HEADING_SIZE, &section.category);
        page.line(BODY_SIZE, &table_row(HEADERS.map(String::from)));
        for row in &section.rows {
            page.line(
                BODY_SIZE,
                &table_row([
                    row.sub_category.clone(),
                    row.merchant.clone(),
                    row.description.clone(),
                    row.quantity.map(|q| q.to_string()).unwrap_or_default(),
                    row.units.clone(),
                    amount(row.amount),
                    amount(row.total_amount),
                    amount(row.actual_amount),
                ]),
            );
        }
        page.pair("Subtotal", format_amount(section.subtotal));
        page.gap();
    }

    let totals = &report.totals;
    page.pair("Grand Total", format_amount(totals.grand_total));
    page.pair("Total Actual", format_amount(totals.total_actual));
    if report.shows_taxes() {
        for line in &totals.tax_lines {
            page.pair(
                &format!("{} ({}%)", line.tax.tax_name, line.tax.percentage.normalize()),
                format_amount(line.amount),
            );
        }
        page.pair("Total Tax", format_amount(totals.total_tax));
        page.pair("Net of Tax", format_amount(totals.grand_total_net_of_tax));
    }
    page.finish()
}

/// Renders the report into PDF bytes.
pub fn render(report: &BudgetReport) -> Result<Vec<u8>, ReportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for operations in layout(report) {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len()).map_err(|e| ReportError::Render(e.to_string()))?;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
