//! In-memory backend double shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tally_shared::types::{BudgetId, ListQuery, ListResponse};
use tally_shared::{AppError, AppResult};

use crate::budget::types::{
    AppliedTax, ApplyTaxRequest, Budget, BudgetCategory, BudgetDraft, BudgetLineItem, BudgetType,
    Merchant, TaxRule, Unit,
};
use crate::ports::BudgetBackend;

type SavedItems = (BudgetId, BudgetType, Vec<BudgetLineItem>);

#[derive(Default)]
pub(crate) struct FakeBackend {
    items: Mutex<HashMap<(String, BudgetType), Vec<BudgetLineItem>>>,
    taxes: Mutex<Vec<AppliedTax>>,
    subcategories: Mutex<HashMap<String, Vec<String>>>,
    saved: Mutex<Vec<SavedItems>>,
    tax_requests: Mutex<Vec<ApplyTaxRequest>>,
    fetch_item_calls: AtomicUsize,
    subcategory_calls: AtomicUsize,
    fail_save_items: AtomicBool,
    fail_apply_taxes: AtomicBool,
    fail_fetch_items: AtomicBool,
    fail_fetch_taxes: AtomicBool,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_items(
        self,
        id: &str,
        budget_type: BudgetType,
        items: Vec<BudgetLineItem>,
    ) -> Self {
        self.items.lock().insert((id.to_string(), budget_type), items);
        self
    }

    pub(crate) fn with_taxes(self, taxes: Vec<AppliedTax>) -> Self {
        *self.taxes.lock() = taxes;
        self
    }

    pub(crate) fn with_subcategories(self, category: &str, names: &[&str]) -> Self {
        self.subcategories.lock().insert(
            category.to_string(),
            names.iter().map(ToString::to_string).collect(),
        );
        self
    }

    pub(crate) fn fail_save_items(&self) {
        self.fail_save_items.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_apply_taxes(&self) {
        self.fail_apply_taxes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_fetch_items(&self) {
        self.fail_fetch_items.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_fetch_taxes(&self) {
        self.fail_fetch_taxes.store(true, Ordering::SeqCst);
    }

    pub(crate) fn saved_items(&self) -> Vec<SavedItems> {
        self.saved.lock().clone()
    }

    pub(crate) fn tax_requests(&self) -> Vec<ApplyTaxRequest> {
        self.tax_requests.lock().clone()
    }

    pub(crate) fn fetch_item_calls(&self) -> usize {
        self.fetch_item_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn subcategory_calls(&self) -> usize {
        self.subcategory_calls.load(Ordering::SeqCst)
    }
}

fn unsupported<T>(what: &str) -> AppResult<T> {
    Err(AppError::Internal(format!("{what} is not supported by the fake backend")))
}

#[async_trait]
impl BudgetBackend for FakeBackend {
    async fn list_budgets(&self, _query: &ListQuery) -> AppResult<ListResponse<Budget>> {
        unsupported("list_budgets")
    }

    async fn get_budget(&self, id: &BudgetId) -> AppResult<Budget> {
        Err(AppError::NotFound(format!("budget {id}")))
    }

    async fn create_budget(&self, _draft: &BudgetDraft) -> AppResult<Budget> {
        unsupported("create_budget")
    }

    async fn update_budget(&self, _id: &BudgetId, _draft: &BudgetDraft) -> AppResult<Budget> {
        unsupported("update_budget")
    }

    async fn delete_budget(&self, _id: &BudgetId) -> AppResult<()> {
        unsupported("delete_budget")
    }

    async fn fetch_items(
        &self,
        id: &BudgetId,
        budget_type: BudgetType,
    ) -> AppResult<Vec<BudgetLineItem>> {
        self.fetch_item_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch_items.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".into()));
        }
        Ok(self
            .items
            .lock()
            .get(&(id.to_string(), budget_type))
            .cloned()
            .unwrap_or_default())
    }

    async fn save_items(
        &self,
        id: &BudgetId,
        budget_type: BudgetType,
        items: &[BudgetLineItem],
    ) -> AppResult<()> {
        if self.fail_save_items.load(Ordering::SeqCst) {
            return Err(AppError::ExternalService("500 Internal Server Error".into()));
        }
        self.items
            .lock()
            .insert((id.to_string(), budget_type), items.to_vec());
        self.saved
            .lock()
            .push((id.clone(), budget_type, items.to_vec()));
        Ok(())
    }

    async fn fetch_applied_taxes(&self, _id: &BudgetId) -> AppResult<Vec<AppliedTax>> {
        if self.fail_fetch_taxes.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".into()));
        }
        Ok(self.taxes.lock().clone())
    }

    async fn apply_taxes(&self, request: &ApplyTaxRequest) -> AppResult<()> {
        if self.fail_apply_taxes.load(Ordering::SeqCst) {
            return Err(AppError::ExternalService("500 Internal Server Error".into()));
        }
        self.tax_requests.lock().push(request.clone());
        Ok(())
    }

    async fn fetch_subcategories(&self, category: &str) -> AppResult<Vec<String>> {
        self.subcategory_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .subcategories
            .lock()
            .get(category)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_categories(&self, _query: &ListQuery) -> AppResult<ListResponse<BudgetCategory>> {
        unsupported("list_categories")
    }

    async fn list_taxes(&self, _query: &ListQuery) -> AppResult<ListResponse<TaxRule>> {
        unsupported("list_taxes")
    }

    async fn list_merchants(&self, _query: &ListQuery) -> AppResult<ListResponse<Merchant>> {
        unsupported("list_merchants")
    }

    async fn list_units(&self, _query: &ListQuery) -> AppResult<ListResponse<Unit>> {
        unsupported("list_units")
    }
}
