//! Budget data types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tally_shared::types::money::{lenient_decimal, lenient_quantity, parse_lenient, parse_quantity};
use tally_shared::types::{BudgetId, CategoryId, CurrencyId, MerchantId, TaxId, UnitId};

use super::error::BudgetError;

/// Which side of the budget a set of line items belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    /// Planned spending.
    #[default]
    Expense,
    /// Planned revenue. The only type taxes are applied to.
    Income,
    /// Sponsorship revenue (wire spelling is `sponsers`).
    Sponsers,
}

impl BudgetType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Sponsers => "sponsers",
        }
    }

    /// Returns true for income budgets.
    #[must_use]
    pub const fn is_income(self) -> bool {
        matches!(self, Self::Income)
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetType {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "sponsers" | "sponsors" => Ok(Self::Sponsers),
            _ => Err(BudgetError::UnknownBudgetType(s.to_string())),
        }
    }
}

/// One row of a budget table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLineItem {
    /// Category name.
    #[serde(default)]
    pub category: String,
    /// Sub-category, only meaningful for the current category.
    #[serde(default)]
    pub sub_category: String,
    /// Merchant or vendor.
    #[serde(default)]
    pub merchant: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Number of units.
    #[serde(default, with = "lenient_quantity")]
    pub quantity: Option<u32>,
    /// Unit of measure.
    #[serde(default)]
    pub units: String,
    /// Per-unit price.
    #[serde(default, with = "lenient_decimal")]
    pub amount: Option<Decimal>,
    /// Row total. Follows amount x quantity but can be overridden.
    #[serde(default, with = "lenient_decimal")]
    pub total_amount: Option<Decimal>,
    /// Amount actually spent or received, entered after the fact.
    #[serde(default, with = "lenient_decimal")]
    pub actual_amount: Option<Decimal>,
    /// Budget side this row belongs to.
    #[serde(default)]
    pub budget_type: BudgetType,
}

/// A single-field edit to a line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemField {
    /// Category changed; clears the sub-category.
    Category(String),
    /// Sub-category changed.
    SubCategory(String),
    /// Merchant changed.
    Merchant(String),
    /// Description changed.
    Description(String),
    /// Quantity changed; recomputes the total.
    Quantity(Option<u32>),
    /// Units changed.
    Units(String),
    /// Per-unit amount changed; recomputes the total.
    Amount(Option<Decimal>),
    /// Total overridden directly.
    TotalAmount(Option<Decimal>),
    /// Actual amount changed.
    ActualAmount(Option<Decimal>),
}

impl LineItemField {
    /// Builds an edit from a form field name and its raw text value.
    ///
    /// Numeric fields are parsed leniently: blank or non-numeric text clears
    /// the field.
    pub fn parse(name: &str, raw: &str) -> Result<Self, BudgetError> {
        Ok(match name {
            "category" => Self::Category(raw.to_string()),
            "sub_category" => Self::SubCategory(raw.to_string()),
            "merchant" => Self::Merchant(raw.to_string()),
            "description" => Self::Description(raw.to_string()),
            "quantity" => Self::Quantity(parse_quantity(raw)),
            "units" => Self::Units(raw.to_string()),
            "amount" => Self::Amount(parse_lenient(raw)),
            "total_amount" => Self::TotalAmount(parse_lenient(raw)),
            "actual_amount" => Self::ActualAmount(parse_lenient(raw)),
            other => return Err(BudgetError::UnknownField(other.to_string())),
        })
    }
}

/// What an edit did beyond setting the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEffect {
    /// Only the edited field changed.
    FieldSet,
    /// The total was recomputed from amount and quantity.
    TotalRecomputed,
    /// The category changed and the sub-category was cleared.
    CategoryChanged(String),
}

impl BudgetLineItem {
    /// Creates the blank row added by "Add Item".
    #[must_use]
    pub fn empty(budget_type: BudgetType) -> Self {
        Self {
            quantity: Some(1),
            budget_type,
            ..Self::default()
        }
    }

    /// Applies a single-field edit.
    ///
    /// Editing amount or quantity recomputes `total_amount` when both are
    /// set. Editing `total_amount` directly is kept until the next amount or
    /// quantity edit.
    pub fn apply(&mut self, field: LineItemField) -> EditEffect {
        match field {
            LineItemField::Category(category) => {
                self.category.clone_from(&category);
                self.sub_category.clear();
                EditEffect::CategoryChanged(category)
            }
            LineItemField::SubCategory(v) => {
                self.sub_category = v;
                EditEffect::FieldSet
            }
            LineItemField::Merchant(v) => {
                self.merchant = v;
                EditEffect::FieldSet
            }
            LineItemField::Description(v) => {
                self.description = v;
                EditEffect::FieldSet
            }
            LineItemField::Units(v) => {
                self.units = v;
                EditEffect::FieldSet
            }
            LineItemField::Quantity(v) => {
                self.quantity = v;
                self.recompute_total()
            }
            LineItemField::Amount(v) => {
                self.amount = v;
                self.recompute_total()
            }
            LineItemField::TotalAmount(v) => {
                self.total_amount = v;
                EditEffect::FieldSet
            }
            LineItemField::ActualAmount(v) => {
                self.actual_amount = v;
                EditEffect::FieldSet
            }
        }
    }

    fn recompute_total(&mut self) -> EditEffect {
        let (Some(amount), Some(quantity)) = (self.amount, self.quantity) else {
            return EditEffect::FieldSet;
        };
        match amount.checked_mul(Decimal::from(quantity)) {
            Some(total) => {
                self.total_amount = Some(total);
                EditEffect::TotalRecomputed
            }
            None => EditEffect::FieldSet,
        }
    }

    /// Returns true if nothing has been entered on the row.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.category.is_empty()
            && self.sub_category.is_empty()
            && self.merchant.is_empty()
            && self.description.is_empty()
            && self.units.is_empty()
            && self.amount.is_none()
            && self.total_amount.is_none()
            && self.actual_amount.is_none()
    }
}

/// A tax rule attached to an income budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTax {
    /// Tax rule ID.
    pub tax_id: TaxId,
    /// Tax name, copied from the rule.
    #[serde(default)]
    pub tax_name: String,
    /// Percentage between 0 and 100.
    pub percentage: Decimal,
}

impl AppliedTax {
    /// Creates an applied tax.
    #[must_use]
    pub fn new(tax_id: impl Into<TaxId>, tax_name: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            tax_id: tax_id.into(),
            tax_name: tax_name.into(),
            percentage,
        }
    }

    /// Tax owed on the given base.
    ///
    /// Clamps at the `Decimal` range when the product does not fit.
    #[must_use]
    pub fn amount_on(&self, base: Decimal) -> Decimal {
        match base.checked_mul(self.percentage) {
            Some(product) => product / Decimal::ONE_HUNDRED,
            None => (base / Decimal::ONE_HUNDRED).saturating_mul(self.percentage),
        }
    }
}

/// One computed tax row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxLine {
    /// The applied tax.
    pub tax: AppliedTax,
    /// Amount derived from the grand total.
    pub amount: Decimal,
}

/// Totals derived from the current rows and applied taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetTotals {
    /// Sum of row totals.
    pub grand_total: Decimal,
    /// Sum of actual amounts.
    pub total_actual: Decimal,
    /// Per-tax amounts.
    pub tax_lines: Vec<TaxLine>,
    /// Sum of per-tax amounts.
    pub total_tax: Decimal,
    /// Grand total minus total tax.
    pub grand_total_net_of_tax: Decimal,
}

/// Per-tax amount sent to the apply-tax endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTaxAmount {
    /// Tax rule ID.
    pub tax_id: TaxId,
    /// Tax name.
    pub tax_name: String,
    /// Percentage applied.
    pub percentage: Decimal,
    /// Computed amount.
    pub amount: Decimal,
}

/// Body of the apply-tax request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyTaxRequest {
    /// Budget the taxes apply to.
    pub budget_id: BudgetId,
    /// Taxable base (the grand total).
    pub base_amount: Decimal,
    /// Computed taxes.
    pub taxes: Vec<AppliedTaxAmount>,
}

/// Date coverage of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetSchedule {
    /// A single day.
    Single {
        /// The day.
        date: NaiveDate,
    },
    /// An inclusive date range.
    Range {
        /// First day.
        from_date: NaiveDate,
        /// Last day.
        to_date: NaiveDate,
    },
}

/// Budget header as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Backend record ID.
    #[serde(alias = "_id")]
    pub id: BudgetId,
    /// Externally visible budget code.
    #[serde(default)]
    pub budget_id: String,
    /// Budget title.
    #[serde(default)]
    pub title: String,
    /// Whether the budget spans a date range.
    #[serde(default)]
    pub multiple_date: bool,
    /// Day covered when `multiple_date` is off.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<NaiveDate>,
    /// Range start when `multiple_date` is on.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub from_date: Option<NaiveDate>,
    /// Range end when `multiple_date` is on.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub to_date: Option<NaiveDate>,
    /// Currency reference.
    #[serde(default)]
    pub currency: Option<CurrencyId>,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Budget {
    /// Resolves the schedule the header describes, if it is complete.
    #[must_use]
    pub fn schedule(&self) -> Option<BudgetSchedule> {
        if self.multiple_date {
            Some(BudgetSchedule::Range {
                from_date: self.from_date?,
                to_date: self.to_date?,
            })
        } else {
            self.date.map(|date| BudgetSchedule::Single { date })
        }
    }
}

/// Accepts `YYYY-MM-DD` as well as full ISO timestamps.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// Parses the date part of a form value or ISO timestamp.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Raw budget header form, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BudgetForm {
    /// Budget title.
    #[serde(default)]
    pub title: String,
    /// Externally visible budget code.
    #[serde(default)]
    pub budget_id: String,
    /// Range toggle.
    #[serde(default)]
    pub multiple_date: bool,
    /// Single date text.
    #[serde(default)]
    pub date: String,
    /// Range start text.
    #[serde(default)]
    pub from_date: String,
    /// Range end text.
    #[serde(default)]
    pub to_date: String,
    /// Currency reference.
    #[serde(default)]
    pub currency: String,
}

/// A validated budget header ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetDraft {
    /// Budget title.
    pub title: String,
    /// Externally visible budget code.
    pub budget_id: String,
    /// Date coverage.
    pub schedule: BudgetSchedule,
    /// Currency reference.
    pub currency: CurrencyId,
}

/// Wire body for budget create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetPayload {
    /// Budget title.
    pub title: String,
    /// Externally visible budget code.
    pub budget_id: String,
    /// Range toggle.
    pub multiple_date: bool,
    /// Single date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Range start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    /// Range end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    /// Currency reference.
    pub currency: CurrencyId,
}

impl BudgetDraft {
    /// Converts to the wire body, writing only the dates the schedule uses.
    #[must_use]
    pub fn to_payload(&self) -> BudgetPayload {
        let (multiple_date, date, from_date, to_date) = match self.schedule {
            BudgetSchedule::Single { date } => (false, Some(date), None, None),
            BudgetSchedule::Range { from_date, to_date } => {
                (true, None, Some(from_date), Some(to_date))
            }
        };
        BudgetPayload {
            title: self.title.clone(),
            budget_id: self.budget_id.clone(),
            multiple_date,
            date,
            from_date,
            to_date,
            currency: self.currency.clone(),
        }
    }
}

/// Budget category with its sub-categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCategory {
    /// Category ID.
    #[serde(alias = "_id")]
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Sub-category names.
    #[serde(default)]
    pub sub_categories: Vec<String>,
}

/// A tax rule that can be applied to income budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    /// Tax rule ID.
    #[serde(alias = "_id")]
    pub id: TaxId,
    /// Tax name.
    pub name: String,
    /// Percentage between 0 and 100.
    pub percentage: Decimal,
}

impl TaxRule {
    /// Converts the rule into an applied tax.
    #[must_use]
    pub fn to_applied(&self) -> AppliedTax {
        AppliedTax::new(self.id.clone(), self.name.clone(), self.percentage)
    }
}

/// A merchant pick-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Merchant ID.
    #[serde(alias = "_id")]
    pub id: MerchantId,
    /// Merchant name.
    pub name: String,
}

/// A unit-of-measure pick-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unit ID.
    #[serde(alias = "_id")]
    pub id: UnitId,
    /// Unit name.
    pub name: String,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
