//! Notification seam between the API layer and whatever front-end hosts it.
//!
//! One-shot writes and failed tracked reads report outcomes through this
//! trait; the front-end decides how to surface them (toast, status line).

use parking_lot::Mutex;

/// A single user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(String),
}

/// Outcome sink for operations that produce user-visible feedback.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Notifier that routes notifications through `tracing`.
///
/// Default for headless use; a UI host would supply its own implementation.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notification = "success", "{}", message);
    }

    fn failure(&self, message: &str) {
        tracing::warn!(notification = "failure", "{}", message);
    }
}

/// In-memory notifier that records every notification in order.
///
/// Used by tests to assert on emission counts and ordering.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications recorded so far, oldest first.
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().clone()
    }

    pub fn failure_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|n| matches!(n, Notification::Failure(_)))
            .count()
    }

    pub fn success_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|n| matches!(n, Notification::Success(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.events
            .lock()
            .push(Notification::Success(message.to_string()));
    }

    fn failure(&self, message: &str) {
        self.events
            .lock()
            .push(Notification::Failure(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.failure("first");
        notifier.success("second");

        let events = notifier.events();
        assert_eq!(
            events,
            vec![
                Notification::Failure("first".to_string()),
                Notification::Success("second".to_string()),
            ]
        );
        assert_eq!(notifier.failure_count(), 1);
        assert_eq!(notifier.success_count(), 1);
    }
}
