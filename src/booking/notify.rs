//! User-facing notifications raised by the booking session.

use std::sync::{Arc, Mutex};

use tracing::{error, warn};
use uuid::Uuid;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Advisory, e.g. an incomplete step.
    Warning,
    /// A failed step transaction.
    Error,
}

/// A message to show the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Text to display.
    pub message: String,
    /// The transaction the message relates to, if any.
    pub transaction_id: Option<Uuid>,
}

impl Notification {
    /// Creates a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
            transaction_id: None,
        }
    }

    /// Creates an error tied to a transaction.
    pub fn error(message: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            transaction_id: Some(transaction_id),
        }
    }
}

/// Delivers notifications to the user interface.
pub trait Notifier: Send + Sync {
    /// Shows a notification.
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Warning => warn!(message = %notification.message, "Booking warning"),
            NotificationLevel::Error => error!(
                message = %notification.message,
                transaction_id = ?notification.transaction_id,
                "Booking error"
            ),
        }
    }
}

/// Keeps every notification in memory, for UIs that poll and for tests.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }
}
