//! Keyed trailing-edge debounce.
//!
//! Each key holds at most one pending value. Scheduling a key again resets
//! its timer and replaces the value; when the window passes with no newer
//! value the last one is sent on the output channel. Dropping the
//! [`Debouncer`] cancels everything still pending.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Delays values per key and delivers only the last one.
#[derive(Debug)]
pub struct Debouncer<K, V> {
    window: Duration,
    tx: UnboundedSender<V>,
    pending: HashMap<K, JoinHandle<()>>,
}

impl<K, V> Debouncer<K, V>
where
    K: Eq + Hash,
    V: Send + 'static,
{
    /// Creates a debouncer and the receiver its values come out of.
    #[must_use]
    pub fn new(window: Duration) -> (Self, UnboundedReceiver<V>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::with_sender(window, tx), rx)
    }

    /// Creates a debouncer that delivers into an existing channel.
    #[must_use]
    pub fn with_sender(window: Duration, tx: UnboundedSender<V>) -> Self {
        Self {
            window,
            tx,
            pending: HashMap::new(),
        }
    }

    /// Delay applied to every value.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Schedules `value` for `key`, replacing anything pending for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&mut self, key: K, value: V) {
        self.pending.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = self.pending.remove(&key) {
            previous.abort();
        }

        let tx = self.tx.clone();
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // Receiver gone means the owner is shutting down.
            let _ = tx.send(value);
        });
        self.pending.insert(key, handle);
    }

    /// Cancels the pending value for `key`. Returns true if one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.pending
            .remove(key)
            .is_some_and(|handle| {
                let live = !handle.is_finished();
                handle.abort();
                live
            })
    }

    /// Cancels every pending value. Returns how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for (_, handle) in self.pending.drain() {
            if !handle.is_finished() {
                cancelled += 1;
            }
            handle.abort();
        }
        cancelled
    }

    /// Number of keys with a value still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl<K, V> Drop for Debouncer<K, V> {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}
