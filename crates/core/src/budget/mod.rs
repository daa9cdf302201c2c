//! Budget line items, applied taxes, totals and the save workflow.

pub mod buffer;
pub mod error;
pub mod save;
pub mod service;
pub mod taxes;
pub mod types;
pub mod validation;


pub use buffer::EditBuffer;
pub use error::BudgetError;
pub use save::{SAVE_FAILURE_MESSAGE, SAVE_SUCCESS_MESSAGE, SaveOutcome, SaveWorkflow};
pub use service::BudgetService;
pub use taxes::AppliedTaxSet;
pub use types::{
    AppliedTax, AppliedTaxAmount, ApplyTaxRequest, Budget, BudgetCategory, BudgetDraft,
    BudgetForm, BudgetLineItem, BudgetPayload, BudgetSchedule, BudgetTotals, BudgetType,
    EditEffect, LineItemField, Merchant, TaxLine, TaxRule, Unit,
};
pub use validation::{ValidationErrors, validate_items};
