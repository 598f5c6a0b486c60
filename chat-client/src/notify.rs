//! User-visible notifications.
//!
//! A failed send is the one error the user is told about. The view layer
//! decides how (modal, stderr line); the synchronizer only calls
//! [`Notifier::alert`].

use std::sync::{Arc, Mutex, PoisonError};

/// Surface for blocking user notifications.
pub trait Notifier: Send + Sync {
    /// Show `message` to the user.
    fn alert(&self, message: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        tracing::error!(alert = true, "{}", message);
    }
}

/// Notifier that keeps every alert, for tests and headless callers.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts so far, oldest first.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order_across_clones() {
        let notifier = RecordingNotifier::new();
        let clone = notifier.clone();

        notifier.alert("first");
        clone.alert("second");

        assert_eq!(notifier.alerts(), vec!["first", "second"]);
    }

    #[test]
    fn notifiers_are_object_safe() {
        let notifiers: Vec<Box<dyn Notifier>> =
            vec![Box::new(LogNotifier), Box::new(RecordingNotifier::new())];
        for n in &notifiers {
            n.alert("ok");
        }
    }
}
