//! The set of taxes applied to an income budget.

use rust_decimal::Decimal;
use tally_shared::types::TaxId;

use super::error::BudgetError;
use super::types::AppliedTax;

/// Applied taxes in the order they were added. Each tax ID appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedTaxSet {
    taxes: Vec<AppliedTax>,
}

impl AppliedTaxSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tax.
    ///
    /// Returns `Ok(false)` without changing anything when the tax ID is
    /// already applied.
    pub fn add(&mut self, tax: AppliedTax) -> Result<bool, BudgetError> {
        check_percentage(&tax)?;
        if self.contains(&tax.tax_id) {
            return Ok(false);
        }
        self.taxes.push(tax);
        Ok(true)
    }

    /// Removes a tax by ID. Returns true if it was present.
    pub fn remove(&mut self, tax_id: &TaxId) -> bool {
        let before = self.taxes.len();
        self.taxes.retain(|t| &t.tax_id != tax_id);
        self.taxes.len() != before
    }

    /// Replaces the whole set, e.g. from a peer broadcast.
    ///
    /// Later duplicates of an ID and taxes with a percentage outside 0..=100
    /// are dropped. Returns how many entries were dropped.
    pub fn replace_all(&mut self, taxes: Vec<AppliedTax>) -> usize {
        self.taxes.clear();
        let mut dropped = 0;
        for tax in taxes {
            if check_percentage(&tax).is_err() || self.contains(&tax.tax_id) {
                dropped += 1;
            } else {
                self.taxes.push(tax);
            }
        }
        dropped
    }

    /// Returns true if the tax ID is applied.
    #[must_use]
    pub fn contains(&self, tax_id: &TaxId) -> bool {
        self.taxes.iter().any(|t| &t.tax_id == tax_id)
    }

    /// Applied taxes.
    #[must_use]
    pub fn as_slice(&self) -> &[AppliedTax] {
        &self.taxes
    }

    /// Number of applied taxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.taxes.len()
    }

    /// Returns true if no tax is applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taxes.is_empty()
    }
}

fn check_percentage(tax: &AppliedTax) -> Result<(), BudgetError> {
    if tax.percentage < Decimal::ZERO || tax.percentage > Decimal::ONE_HUNDRED {
        return Err(BudgetError::PercentageOutOfRange(tax.percentage));
    }
    Ok(())
}
