//! Ordered in-memory buffer of line items for one budget and type.
//!
//! Local edits and inbound patches both land here. Inbound patches address
//! rows by index only; there is no versioning, so the last patch for an
//! index wins.

use tracing::warn;

use super::error::BudgetError;
use super::types::{BudgetLineItem, BudgetType, EditEffect, LineItemField};

/// Highest row count an inbound patch may grow the buffer to.
pub const MAX_ROWS: usize = 10_000;

/// Line items being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    budget_type: BudgetType,
    items: Vec<BudgetLineItem>,
}

impl EditBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new(budget_type: BudgetType) -> Self {
        Self {
            budget_type,
            items: Vec::new(),
        }
    }

    /// Creates a buffer holding rows loaded from the backend.
    #[must_use]
    pub fn from_items(budget_type: BudgetType, items: Vec<BudgetLineItem>) -> Self {
        let mut buffer = Self::new(budget_type);
        buffer.replace_all(items);
        buffer
    }

    /// Budget type of every row.
    #[must_use]
    pub const fn budget_type(&self) -> BudgetType {
        self.budget_type
    }

    /// Rows in display order.
    #[must_use]
    pub fn items(&self) -> &[BudgetLineItem] {
        &self.items
    }

    /// Row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BudgetLineItem> {
        self.items.get(index)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a blank row and returns its index.
    pub fn add_item(&mut self) -> usize {
        self.items.push(BudgetLineItem::empty(self.budget_type));
        self.items.len() - 1
    }

    /// Applies a local single-field edit.
    pub fn edit(&mut self, index: usize, field: LineItemField) -> Result<EditEffect, BudgetError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(BudgetError::row_out_of_range(index, len))?;
        Ok(item.apply(field))
    }

    /// Removes a row locally.
    pub fn remove(&mut self, index: usize) -> Result<BudgetLineItem, BudgetError> {
        if index >= self.items.len() {
            return Err(BudgetError::row_out_of_range(index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }

    /// Moves a row from one position to another (drag reorder).
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), BudgetError> {
        let len = self.items.len();
        if from >= len {
            return Err(BudgetError::row_out_of_range(from, len));
        }
        if to >= len {
            return Err(BudgetError::row_out_of_range(to, len));
        }
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        Ok(())
    }

    /// Applies a row patch received from a peer.
    ///
    /// An index past the end grows the buffer with blank rows so the patch
    /// lands where the peer put it, up to [`MAX_ROWS`] rows. Patches beyond
    /// that are ignored and return false. Applying the same patch twice is
    /// the same as applying it once.
    pub fn apply_patch(&mut self, index: usize, mut item: BudgetLineItem) -> bool {
        let Some(needed) = index.checked_add(1).filter(|&n| n <= MAX_ROWS) else {
            warn!(index, max = MAX_ROWS, "Ignored row patch past the row limit");
            return false;
        };
        item.budget_type = self.budget_type;
        if needed > self.items.len() {
            let budget_type = self.budget_type;
            self.items
                .resize_with(needed, || BudgetLineItem::empty(budget_type));
        }
        self.items[index] = item;
        true
    }

    /// Applies a row removal received from a peer. Unknown indexes are ignored.
    pub fn apply_removal(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.remove(index);
            true
        } else {
            false
        }
    }

    /// Replaces every row, e.g. after a reload.
    pub fn replace_all(&mut self, items: Vec<BudgetLineItem>) {
        let budget_type = self.budget_type;
        self.items = items
            .into_iter()
            .map(|mut item| {
                item.budget_type = budget_type;
                item
            })
            .collect();
    }
}
