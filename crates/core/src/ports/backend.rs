//! REST backend port.

use async_trait::async_trait;
use tally_shared::AppResult;
use tally_shared::types::{BudgetId, ListQuery, ListResponse};

use crate::budget::types::{
    AppliedTax, ApplyTaxRequest, Budget, BudgetCategory, BudgetDraft, BudgetLineItem, BudgetType,
    Merchant, TaxRule, Unit,
};

/// Operations the budget screens need from the REST backend.
#[async_trait]
pub trait BudgetBackend: Send + Sync {
    /// Lists budget headers.
    async fn list_budgets(&self, query: &ListQuery) -> AppResult<ListResponse<Budget>>;

    /// Fetches one budget header.
    async fn get_budget(&self, id: &BudgetId) -> AppResult<Budget>;

    /// Creates a budget header.
    async fn create_budget(&self, draft: &BudgetDraft) -> AppResult<Budget>;

    /// Updates a budget header.
    async fn update_budget(&self, id: &BudgetId, draft: &BudgetDraft) -> AppResult<Budget>;

    /// Soft-deletes a budget.
    async fn delete_budget(&self, id: &BudgetId) -> AppResult<()>;

    /// Loads the line items stored for a budget and type.
    async fn fetch_items(
        &self,
        id: &BudgetId,
        budget_type: BudgetType,
    ) -> AppResult<Vec<BudgetLineItem>>;

    /// Replaces the stored line items for a budget and type.
    async fn save_items(
        &self,
        id: &BudgetId,
        budget_type: BudgetType,
        items: &[BudgetLineItem],
    ) -> AppResult<()>;

    /// Loads the taxes last applied to a budget.
    async fn fetch_applied_taxes(&self, id: &BudgetId) -> AppResult<Vec<AppliedTax>>;

    /// Stores computed tax amounts for a budget.
    async fn apply_taxes(&self, request: &ApplyTaxRequest) -> AppResult<()>;

    /// Sub-category names for a category.
    async fn fetch_subcategories(&self, category: &str) -> AppResult<Vec<String>>;

    /// Lists budget categories.
    async fn list_categories(&self, query: &ListQuery) -> AppResult<ListResponse<BudgetCategory>>;

    /// Lists tax rules.
    async fn list_taxes(&self, query: &ListQuery) -> AppResult<ListResponse<TaxRule>>;

    /// Lists merchants.
    async fn list_merchants(&self, query: &ListQuery) -> AppResult<ListResponse<Merchant>>;

    /// Lists units of measure.
    async fn list_units(&self, query: &ListQuery) -> AppResult<ListResponse<Unit>>;
}
