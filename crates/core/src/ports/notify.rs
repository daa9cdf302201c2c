//! User-facing notifications (toasts).

use parking_lot::Mutex;
use tracing::{info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// A notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

/// Surface for outcome messages. Failures never propagate past it.
pub trait Notifier: Send + Sync {
    /// Reports a success.
    fn success(&self, message: &str);

    /// Reports a failure.
    fn error(&self, message: &str);
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(notification = message, "success");
    }

    fn error(&self, message: &str) {
        warn!(notification = message, "error");
    }
}

/// Notifier that keeps every message, for headless use and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications so far.
    #[must_use]
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    /// Number of notifications at a level.
    #[must_use]
    pub fn count(&self, level: NotificationLevel) -> usize {
        self.entries.lock().iter().filter(|n| n.level == level).count()
    }

    fn push(&self, level: NotificationLevel, message: &str) {
        self.entries.lock().push(Notification {
            level,
            message: message.to_string(),
        });
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.push(NotificationLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_counts() {
        let notifier = RecordingNotifier::new();
        notifier.success("saved");
        notifier.error("failed");
        notifier.error("failed again");
        assert_eq!(notifier.count(NotificationLevel::Success), 1);
        assert_eq!(notifier.count(NotificationLevel::Error), 2);
        assert_eq!(notifier.entries()[0].message, "saved");
    }
}
