//! One user's editing session for a budget table.
//!
//! The session owns the row buffer and applied taxes, mirrors local edits
//! to the room and applies peer patches by index. Row and tax broadcasts
//! are debounced; removals and sub-category lists go out immediately.
//! Inbound patches win over local state with no conflict detection.
//!
//! Every failure ends in a notification or a log line. Nothing here is
//! retried and nothing is fatal.

use std::sync::Arc;
use std::time::Duration;

use tally_shared::types::TaxId;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::channel::{RealtimeChannel, RoomSubscription};
use super::debounce::Debouncer;
use super::events::{
    ClientEvent, ItemChanged, ItemRemoved, RoomKey, ServerEvent, SubcategoryUpdate, TaxChanged,
};
use super::subcategory::SubcategoryCache;
use crate::budget::buffer::EditBuffer;
use crate::budget::error::BudgetError;
use crate::budget::save::{SaveOutcome, SaveWorkflow};
use crate::budget::service::BudgetService;
use crate::budget::taxes::AppliedTaxSet;
use crate::budget::types::{
    AppliedTax, BudgetLineItem, BudgetTotals, EditEffect, LineItemField,
};
use crate::ports::{BudgetBackend, Notifier};

/// Message shown when rows cannot be loaded.
pub const LOAD_ITEMS_FAILURE_MESSAGE: &str = "Failed to load budget items";
/// Message shown when applied taxes cannot be loaded.
pub const LOAD_TAXES_FAILURE_MESSAGE: &str = "Failed to load applied taxes";
/// Message shown when sub-categories cannot be loaded.
pub const SUBCATEGORY_FAILURE_MESSAGE: &str = "Failed to load sub-categories";

/// Collaborative editing state for one budget and type.
pub struct CoEditSession {
    room: RoomKey,
    buffer: EditBuffer,
    taxes: AppliedTaxSet,
    backend: Arc<dyn BudgetBackend>,
    channel: Arc<dyn RealtimeChannel>,
    notifier: Arc<dyn Notifier>,
    subscription: Option<RoomSubscription>,
    row_broadcasts: Debouncer<usize, ClientEvent>,
    tax_broadcast: Debouncer<(), ClientEvent>,
    subcategories: SubcategoryCache,
    pump: JoinHandle<()>,
}

impl CoEditSession {
    /// Joins the room and loads the stored rows (and taxes for income).
    ///
    /// A failed join leaves the session working locally. Failed loads leave
    /// the buffer empty and notify.
    pub async fn open(
        room: RoomKey,
        backend: Arc<dyn BudgetBackend>,
        channel: Arc<dyn RealtimeChannel>,
        notifier: Arc<dyn Notifier>,
        window: Duration,
    ) -> Self {
        let subscription = match channel.join(&room).await {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                warn!(%room, error = %e, "Could not join room; edits stay local");
                None
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(forward(Arc::clone(&channel), room.clone(), rx));

        let mut session = Self {
            buffer: EditBuffer::new(room.budget_type),
            taxes: AppliedTaxSet::new(),
            row_broadcasts: Debouncer::with_sender(window, tx.clone()),
            tax_broadcast: Debouncer::with_sender(window, tx),
            subcategories: SubcategoryCache::new(),
            room,
            backend,
            channel,
            notifier,
            subscription,
            pump,
        };
        session.reload().await;
        info!(room = %session.room, rows = session.buffer.len(), "Editing session opened");
        session
    }

    /// Room this session edits.
    #[must_use]
    pub fn room(&self) -> &RoomKey {
        &self.room
    }

    /// Current rows.
    #[must_use]
    pub fn items(&self) -> &[BudgetLineItem] {
        self.buffer.items()
    }

    /// Currently applied taxes.
    #[must_use]
    pub fn taxes(&self) -> &[AppliedTax] {
        self.taxes.as_slice()
    }

    /// Derived totals for the current rows and taxes.
    #[must_use]
    pub fn totals(&self) -> BudgetTotals {
        BudgetService::totals(self.buffer.items(), self.taxes.as_slice())
    }

    /// Broadcasts still waiting for their debounce window.
    #[must_use]
    pub fn pending_broadcasts(&self) -> usize {
        self.row_broadcasts.pending() + self.tax_broadcast.pending()
    }

    /// Cached sub-categories for a category, if resolved this session.
    pub async fn subcategories(&self, category: &str) -> Option<Arc<Vec<String>>> {
        self.subcategories.get(category).await
    }

    /// Appends a blank row and broadcasts it.
    pub fn add_item(&mut self) -> usize {
        let index = self.buffer.add_item();
        self.schedule_row(index);
        index
    }

    /// Applies a form edit given as field name and raw text.
    pub async fn edit(
        &mut self,
        index: usize,
        field: &str,
        raw: &str,
    ) -> Result<EditEffect, BudgetError> {
        let field = LineItemField::parse(field, raw)?;
        self.edit_field(index, field).await
    }

    /// Applies a single-field edit and schedules the row broadcast.
    ///
    /// Choosing a category also resolves its sub-categories (once per
    /// session) and broadcasts the list right away.
    pub async fn edit_field(
        &mut self,
        index: usize,
        field: LineItemField,
    ) -> Result<EditEffect, BudgetError> {
        let effect = self.buffer.edit(index, field)?;
        self.schedule_row(index);

        if let EditEffect::CategoryChanged(category) = &effect
            && !category.is_empty()
        {
            self.resolve_subcategories(category).await;
        }
        Ok(effect)
    }

    /// Removes a row and broadcasts the removal immediately.
    ///
    /// Pending broadcasts for the removed row are dropped; those for rows
    /// after it are re-issued at their new positions.
    pub async fn remove_item(&mut self, index: usize) -> Result<BudgetLineItem, BudgetError> {
        let len_before = self.buffer.len();
        let removed = self.buffer.remove(index)?;
        let shifted = self.cancel_rows_from(index, len_before);

        self.emit_now(ClientEvent::BudgetItemRemoved(ItemRemoved {
            room: self.room.clone(),
            index,
        }))
        .await;

        for i in shifted {
            self.schedule_row(i);
        }
        Ok(removed)
    }

    /// Moves a row. Reordering is local and is not broadcast.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), BudgetError> {
        self.buffer.reorder(from, to)
    }

    /// Applies a tax. Returns false if it was already applied.
    pub fn add_tax(&mut self, tax: AppliedTax) -> Result<bool, BudgetError> {
        let added = self.taxes.add(tax)?;
        if added {
            self.schedule_taxes();
        }
        Ok(added)
    }

    /// Removes an applied tax. Returns false if it was not applied.
    pub fn remove_tax(&mut self, tax_id: &TaxId) -> bool {
        let removed = self.taxes.remove(tax_id);
        if removed {
            self.schedule_taxes();
        }
        removed
    }

    /// Applies a peer event. Events for other rooms are ignored.
    pub async fn apply_inbound(&mut self, event: ServerEvent) -> bool {
        if event.room() != &self.room {
            debug!(room = %self.room, other = %event.room(), "Ignored event for another room");
            return false;
        }
        match event {
            ServerEvent::ReceivedBudgetItemChanged(ItemChanged { index, item, .. }) => {
                self.buffer.apply_patch(index, item)
            }
            ServerEvent::ReceivedBudgetItemRemoved(ItemRemoved { index, .. }) => {
                let len_before = self.buffer.len();
                if !self.buffer.apply_removal(index) {
                    return false;
                }
                for i in self.cancel_rows_from(index, len_before) {
                    self.schedule_row(i);
                }
                true
            }
            ServerEvent::ReceivedBudgetSubcategoryUpdate(SubcategoryUpdate {
                category,
                sub_categories,
                ..
            }) => {
                self.subcategories.insert(category, sub_categories).await;
                true
            }
            ServerEvent::ReceivedBudgetTaxChanged(TaxChanged { taxes, .. }) => {
                let dropped = self.taxes.replace_all(taxes);
                if dropped > 0 {
                    warn!(room = %self.room, dropped, "Dropped invalid or duplicate peer taxes");
                }
                true
            }
        }
    }

    /// Applies every queued peer event without waiting. Returns how many
    /// changed the session.
    pub async fn drain_inbound(&mut self) -> usize {
        let mut queued = Vec::new();
        if let Some(subscription) = self.subscription.as_mut() {
            while let Some(event) = subscription.try_recv() {
                queued.push(event);
            }
        }
        let mut applied = 0;
        for event in queued {
            if self.apply_inbound(event).await {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next peer event and applies it.
    ///
    /// Returns `None` when not in a room or the channel closed.
    pub async fn next_inbound(&mut self) -> Option<ServerEvent> {
        let event = self.subscription.as_mut()?.recv().await?;
        self.apply_inbound(event.clone()).await;
        Some(event)
    }

    /// Saves rows and taxes. Stored data is reloaded only after a full save.
    pub async fn save(&mut self) -> SaveOutcome {
        let outcome = SaveWorkflow::new(self.backend.as_ref(), self.notifier.as_ref())
            .save(
                &self.room.budget_id,
                self.room.budget_type,
                self.buffer.items(),
                self.taxes.as_slice(),
            )
            .await;
        if outcome.is_saved() {
            self.reload().await;
        }
        outcome
    }

    /// Reloads rows, and taxes for income budgets, from the backend.
    pub async fn reload(&mut self) {
        let budget_id = &self.room.budget_id;
        match self
            .backend
            .fetch_items(budget_id, self.room.budget_type)
            .await
        {
            Ok(items) => self.buffer.replace_all(items),
            Err(e) => {
                warn!(room = %self.room, error = %e, "Failed to load budget items");
                self.notifier.error(LOAD_ITEMS_FAILURE_MESSAGE);
            }
        }

        if self.room.budget_type.is_income() {
            match self.backend.fetch_applied_taxes(budget_id).await {
                Ok(taxes) => {
                    let dropped = self.taxes.replace_all(taxes);
                    if dropped > 0 {
                        warn!(room = %self.room, dropped, "Dropped invalid stored taxes");
                    }
                }
                Err(e) => {
                    warn!(room = %self.room, error = %e, "Failed to load applied taxes");
                    self.notifier.error(LOAD_TAXES_FAILURE_MESSAGE);
                }
            }
        }
    }

    /// Cancels pending broadcasts and leaves the room.
    pub async fn close(mut self) {
        let dropped = self.row_broadcasts.cancel_all() + self.tax_broadcast.cancel_all();
        self.subscription = None;
        if let Err(e) = self.channel.leave(&self.room).await {
            debug!(room = %self.room, error = %e, "Leave failed during close");
        }
        info!(room = %self.room, dropped, "Editing session closed");
    }

    /// Cancels pending row broadcasts from `index` on, after the row at
    /// `index` was removed. Returns the new indexes of the shifted rows
    /// whose broadcasts must be re-issued.
    fn cancel_rows_from(&mut self, index: usize, len_before: usize) -> Vec<usize> {
        let mut shifted = Vec::new();
        for i in index..len_before {
            if self.row_broadcasts.cancel(&i) && i > index {
                shifted.push(i - 1);
            }
        }
        shifted
    }

    fn schedule_row(&mut self, index: usize) {
        if let Some(item) = self.buffer.get(index) {
            let event = ClientEvent::BudgetItemChanged(ItemChanged {
                room: self.room.clone(),
                index,
                item: item.clone(),
            });
            self.row_broadcasts.schedule(index, event);
        }
    }

    fn schedule_taxes(&mut self) {
        let event = ClientEvent::BudgetTaxChanged(TaxChanged {
            room: self.room.clone(),
            taxes: self.taxes.as_slice().to_vec(),
        });
        self.tax_broadcast.schedule((), event);
    }

    async fn resolve_subcategories(&self, category: &str) {
        match self
            .subcategories
            .resolve(self.backend.as_ref(), category)
            .await
        {
            Ok(names) => {
                self.emit_now(ClientEvent::BudgetSubcategoryUpdate(SubcategoryUpdate {
                    room: self.room.clone(),
                    category: category.to_string(),
                    sub_categories: names.as_ref().clone(),
                }))
                .await;
            }
            Err(e) => {
                warn!(room = %self.room, category, error = %e, "Failed to load sub-categories");
                self.notifier.error(SUBCATEGORY_FAILURE_MESSAGE);
            }
        }
    }

    async fn emit_now(&self, event: ClientEvent) {
        emit_logged(self.channel.as_ref(), &self.room, event).await;
    }
}

impl Drop for CoEditSession {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn emit_logged(channel: &dyn RealtimeChannel, room: &RoomKey, event: ClientEvent) {
    let name = event.name();
    if let Err(e) = channel.emit(event).await {
        warn!(%room, event = name, error = %e, "Dropped real-time event");
    }
}

async fn forward(
    channel: Arc<dyn RealtimeChannel>,
    room: RoomKey,
    mut rx: UnboundedReceiver<ClientEvent>,
) {
    while let Some(event) = rx.recv().await {
        emit_logged(channel.as_ref(), &room, event).await;
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
