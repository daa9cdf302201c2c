//! Interfaces the editing flow depends on.
//!
//! Adapters live outside this crate: the REST client implements
//! [`BudgetBackend`], UIs implement [`Notifier`].

pub mod backend;
pub mod notify;

pub use backend::BudgetBackend;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
