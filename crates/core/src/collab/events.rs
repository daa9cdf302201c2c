//! Wire events for budget rooms.
//!
//! Frames are JSON text of the form `{"event": "<name>", "data": {...}}`.
//! Clients send [`ClientEvent`]s; the relay forwards each one to the other
//! members of the room as the matching [`ServerEvent`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tally_shared::types::BudgetId;

use crate::budget::types::{AppliedTax, BudgetLineItem, BudgetType};

/// Identifies the room for one budget and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomKey {
    /// Budget being edited.
    pub budget_id: BudgetId,
    /// Which table of the budget.
    pub budget_type: BudgetType,
}

impl RoomKey {
    /// Creates a room key.
    #[must_use]
    pub fn new(budget_id: impl Into<BudgetId>, budget_type: BudgetType) -> Self {
        Self {
            budget_id: budget_id.into(),
            budget_type,
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "budget:{}:{}", self.budget_id, self.budget_type)
    }
}

/// A row changed at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChanged {
    /// Room the change belongs to.
    pub room: RoomKey,
    /// Row position.
    pub index: usize,
    /// Full row value after the change.
    pub item: BudgetLineItem,
}

/// The row at `index` was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    /// Room the removal belongs to.
    pub room: RoomKey,
    /// Row position.
    pub index: usize,
}

/// Sub-categories resolved for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryUpdate {
    /// Room the update belongs to.
    pub room: RoomKey,
    /// Category name.
    pub category: String,
    /// Sub-category names.
    pub sub_categories: Vec<String>,
}

/// The applied tax set was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxChanged {
    /// Room the change belongs to.
    pub room: RoomKey,
    /// Applied taxes after the change.
    pub taxes: Vec<AppliedTax>,
}

/// Events a client sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join a room.
    JoinBudgetRoom(RoomKey),
    /// Leave a room.
    LeaveBudgetRoom(RoomKey),
    /// A row changed.
    BudgetItemChanged(ItemChanged),
    /// A row was removed.
    BudgetItemRemoved(ItemRemoved),
    /// Sub-categories were resolved.
    BudgetSubcategoryUpdate(SubcategoryUpdate),
    /// Applied taxes changed.
    BudgetTaxChanged(TaxChanged),
}

impl ClientEvent {
    /// Room the event targets.
    #[must_use]
    pub fn room(&self) -> &RoomKey {
        match self {
            Self::JoinBudgetRoom(room) | Self::LeaveBudgetRoom(room) => room,
            Self::BudgetItemChanged(e) => &e.room,
            Self::BudgetItemRemoved(e) => &e.room,
            Self::BudgetSubcategoryUpdate(e) => &e.room,
            Self::BudgetTaxChanged(e) => &e.room,
        }
    }

    /// The event peers receive, or `None` for membership events.
    #[must_use]
    pub fn relay(self) -> Option<ServerEvent> {
        match self {
            Self::JoinBudgetRoom(_) | Self::LeaveBudgetRoom(_) => None,
            Self::BudgetItemChanged(e) => Some(ServerEvent::ReceivedBudgetItemChanged(e)),
            Self::BudgetItemRemoved(e) => Some(ServerEvent::ReceivedBudgetItemRemoved(e)),
            Self::BudgetSubcategoryUpdate(e) => {
                Some(ServerEvent::ReceivedBudgetSubcategoryUpdate(e))
            }
            Self::BudgetTaxChanged(e) => Some(ServerEvent::ReceivedBudgetTaxChanged(e)),
        }
    }

    /// Event name on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JoinBudgetRoom(_) => "join-budget-room",
            Self::LeaveBudgetRoom(_) => "leave-budget-room",
            Self::BudgetItemChanged(_) => "budget-item-changed",
            Self::BudgetItemRemoved(_) => "budget-item-removed",
            Self::BudgetSubcategoryUpdate(_) => "budget-subcategory-update",
            Self::BudgetTaxChanged(_) => "budget-tax-changed",
        }
    }
}

/// Events a client receives from peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A peer changed a row.
    ReceivedBudgetItemChanged(ItemChanged),
    /// A peer removed a row.
    ReceivedBudgetItemRemoved(ItemRemoved),
    /// A peer resolved sub-categories.
    ReceivedBudgetSubcategoryUpdate(SubcategoryUpdate),
    /// A peer changed the applied taxes.
    ReceivedBudgetTaxChanged(TaxChanged),
}

impl ServerEvent {
    /// Room the event belongs to.
    #[must_use]
    pub fn room(&self) -> &RoomKey {
        match self {
            Self::ReceivedBudgetItemChanged(e) => &e.room,
            Self::ReceivedBudgetItemRemoved(e) => &e.room,
            Self::ReceivedBudgetSubcategoryUpdate(e) => &e.room,
            Self::ReceivedBudgetTaxChanged(e) => &e.room,
        }
    }
}
