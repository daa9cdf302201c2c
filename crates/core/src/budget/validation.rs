//! Boundary validation for budget forms and line items.
//!
//! Validation runs before any network call. Failures are collected per field
//! so a form can show every message at once.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use tally_shared::types::CurrencyId;

use super::service::BudgetService;
use super::types::{BudgetDraft, BudgetForm, BudgetLineItem, BudgetSchedule, parse_date};

/// Field name to messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Number of fields with at least one message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns `Ok(value)` when empty, otherwise the errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl BudgetForm {
    /// Validates the header form into a draft.
    ///
    /// Title, budget code and currency are required. With `multiple_date` off
    /// a date is required; with it on both range ends are required and the
    /// range must not run backwards.
    pub fn validate(&self) -> Result<BudgetDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        if self.budget_id.trim().is_empty() {
            errors.add("budget_id", "Budget ID is required");
        }
        if self.currency.trim().is_empty() {
            errors.add("currency", "Currency is required");
        }

        let schedule = if self.multiple_date {
            let from = required_date(&mut errors, "from_date", &self.from_date);
            let to = required_date(&mut errors, "to_date", &self.to_date);
            match (from, to) {
                (Some(from_date), Some(to_date)) if from_date > to_date => {
                    errors.add("to_date", "End date must be on or after start date");
                    None
                }
                (Some(from_date), Some(to_date)) => Some(BudgetSchedule::Range { from_date, to_date }),
                _ => None,
            }
        } else {
            required_date(&mut errors, "date", &self.date).map(|date| BudgetSchedule::Single { date })
        };

        match schedule {
            Some(schedule) if errors.is_empty() => Ok(BudgetDraft {
                title: self.title.trim().to_string(),
                budget_id: self.budget_id.trim().to_string(),
                schedule,
                currency: CurrencyId::new(self.currency.trim()),
            }),
            _ => Err(errors),
        }
    }
}

fn required_date(
    errors: &mut ValidationErrors,
    field: &str,
    raw: &str,
) -> Option<chrono::NaiveDate> {
    if raw.trim().is_empty() {
        errors.add(field, "Date is required");
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.add(field, "Date must be in YYYY-MM-DD format");
    }
    parsed
}

/// Checks every row before save.
///
/// Quantity, when set, must be at least 1; amounts, when set, must not be
/// negative. Field keys look like `items[2].quantity`.
pub fn validate_items(items: &[BudgetLineItem]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (index, item) in items.iter().enumerate() {
        if item.quantity == Some(0) {
            errors.add(
                format!("items[{index}].quantity"),
                "Quantity must be at least 1",
            );
        }
        for (name, value) in [
            ("amount", item.amount),
            ("total_amount", item.total_amount),
            ("actual_amount", item.actual_amount),
        ] {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                errors.add(
                    format!("items[{index}].{name}"),
                    "Amount cannot be negative",
                );
            }
        }
    }
    if BudgetService::checked_grand_total(items).is_none() {
        errors.add("items", "Grand total is too large");
    }
    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::BudgetType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn form() -> BudgetForm {
        BudgetForm {
            title: "Morning Show Q3".into(),
            budget_id: "BGT-0042".into(),
            multiple_date: false,
            date: "2024-07-01".into(),
            currency: "cur-inr".into(),
            ..BudgetForm::default()
        }
    }

    #[test]
    fn test_single_date_form_is_valid() {
        let draft = form().validate().unwrap();
        assert_eq!(
            draft.schedule,
            BudgetSchedule::Single {
                date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
            }
        );
        assert_eq!(draft.currency.as_str(), "cur-inr");
    }

    #[test]
    fn test_iso_timestamp_dates_accepted() {
        let mut f = form();
        f.date = "2024-07-01T00:00:00.000Z".into();
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_required_fields_collected() {
        let errors = BudgetForm::default().validate().unwrap_err();
        assert!(errors.get("title").is_some());
        assert!(errors.get("budget_id").is_some());
        assert!(errors.get("currency").is_some());
        assert!(errors.get("date").is_some());
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_range_requires_both_dates() {
        let mut f = form();
        f.multiple_date = true;
        f.from_date = "2024-07-01".into();
        let errors = f.validate().unwrap_err();
        assert!(errors.get("to_date").is_some());
        assert!(errors.get("date").is_none());
    }

    #[test]
    fn test_range_must_not_run_backwards() {
        let mut f = form();
        f.multiple_date = true;
        f.from_date = "2024-07-31".into();
        f.to_date = "2024-07-01".into();
        let errors = f.validate().unwrap_err();
        assert_eq!(
            errors.get("to_date").unwrap(),
            ["End date must be on or after start date".to_string()]
        );
    }

    #[test]
    fn test_range_ignores_single_date() {
        let mut f = form();
        f.multiple_date = true;
        f.date = String::new();
        f.from_date = "2024-07-01".into();
        f.to_date = "2024-07-31".into();
        let draft = f.validate().unwrap();
        let payload = draft.to_payload();
        assert!(payload.multiple_date);
        assert!(payload.date.is_none());
        assert_eq!(payload.to_date, NaiveDate::from_ymd_opt(2024, 7, 31));
    }

    #[test]
    fn test_bad_date_format() {
        let mut f = form();
        f.date = "01/07/2024".into();
        let errors = f.validate().unwrap_err();
        assert_eq!(
            errors.get("date").unwrap(),
            ["Date must be in YYYY-MM-DD format".to_string()]
        );
    }

    #[test]
    fn test_validate_items() {
        let mut ok = BudgetLineItem::empty(BudgetType::Expense);
        ok.amount = Some(dec!(10));
        assert!(validate_items(&[ok.clone()]).is_ok());

        let mut bad = ok.clone();
        bad.quantity = Some(0);
        bad.actual_amount = Some(dec!(-1));
        let errors = validate_items(&[ok, bad]).unwrap_err();
        assert!(errors.get("items[1].quantity").is_some());
        assert!(errors.get("items[1].actual_amount").is_some());
        assert!(errors.get("items[0].quantity").is_none());
        assert_eq!(
            errors.to_string(),
            "items[1].actual_amount: Amount cannot be negative; items[1].quantity: Quantity must be at least 1"
        );
    }

    #[test]
    fn test_validate_items_rejects_overflowing_total() {
        let mut huge = BudgetLineItem::empty(BudgetType::Income);
        huge.total_amount = Some(Decimal::MAX);
        assert!(validate_items(&[huge.clone()]).is_ok());

        let errors = validate_items(&[huge.clone(), huge]).unwrap_err();
        assert_eq!(errors.get("items"), Some(&["Grand total is too large".to_string()][..]));
    }
}
