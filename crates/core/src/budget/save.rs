//! Two-phase save of line items and applied taxes.
//!
//! Step one replaces the stored rows for the budget and type. Step two, for
//! income budgets with taxes, stores the computed tax amounts. The steps are
//! not atomic: if step two fails the rows stay saved and nothing is rolled
//! back. Each failure produces one generic notification.

use tally_shared::AppError;
use tally_shared::types::BudgetId;
use tracing::{info, warn};

use super::service::BudgetService;
use super::types::{AppliedTax, BudgetLineItem, BudgetType};
use super::validation::{ValidationErrors, validate_items};
use crate::ports::{BudgetBackend, Notifier};

/// Message shown after a full save.
pub const SAVE_SUCCESS_MESSAGE: &str = "Budget items saved successfully";
/// Message shown when either step fails.
pub const SAVE_FAILURE_MESSAGE: &str = "Failed to save budget items";

/// Result of a save attempt.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Rows (and taxes, when applicable) were stored.
    Saved,
    /// Rows failed validation; nothing was sent.
    Invalid(ValidationErrors),
    /// Storing rows failed; taxes were not attempted.
    ItemsFailed(AppError),
    /// Rows were stored but storing taxes failed.
    TaxFailed(AppError),
}

impl SaveOutcome {
    /// Returns true if everything was stored.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Runs the save steps against a backend.
pub struct SaveWorkflow<'a> {
    backend: &'a dyn BudgetBackend,
    notifier: &'a dyn Notifier,
}

impl<'a> SaveWorkflow<'a> {
    /// Creates a workflow.
    #[must_use]
    pub fn new(backend: &'a dyn BudgetBackend, notifier: &'a dyn Notifier) -> Self {
        Self { backend, notifier }
    }

    /// Validates and stores the rows, then the taxes for income budgets.
    pub async fn save(
        &self,
        budget_id: &BudgetId,
        budget_type: BudgetType,
        items: &[BudgetLineItem],
        taxes: &[AppliedTax],
    ) -> SaveOutcome {
        if let Err(errors) = validate_items(items) {
            info!(%budget_id, %budget_type, %errors, "Save blocked by validation");
            return SaveOutcome::Invalid(errors);
        }

        if let Err(e) = self.backend.save_items(budget_id, budget_type, items).await {
            warn!(%budget_id, %budget_type, error = %e, "Failed to save budget items");
            self.notifier.error(SAVE_FAILURE_MESSAGE);
            return SaveOutcome::ItemsFailed(e);
        }
        info!(%budget_id, %budget_type, rows = items.len(), "Budget items saved");

        if budget_type.is_income() && !taxes.is_empty() {
            let totals = BudgetService::totals(items, taxes);
            let request = BudgetService::tax_request(budget_id, &totals);
            if let Err(e) = self.backend.apply_taxes(&request).await {
                warn!(%budget_id, error = %e, "Failed to apply taxes after items were saved");
                self.notifier.error(SAVE_FAILURE_MESSAGE);
                return SaveOutcome::TaxFailed(e);
            }
            info!(%budget_id, taxes = request.taxes.len(), base_amount = %request.base_amount, "Taxes applied");
        }

        self.notifier.success(SAVE_SUCCESS_MESSAGE);
        SaveOutcome::Saved
    }
}
