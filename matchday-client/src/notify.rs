//! User-visible failure notifications.
//!
//! Failed friendship actions are never returned to the caller as errors.
//! They are rolled back and reported through a [`Notifier`], which the app
//! shell turns into a transient toast.

use matchday_core::TransitionKind;
use tokio::sync::mpsc;

use crate::api::ApiError;

/// Fallback text when the server did not say what went wrong.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Transition that failed.
    pub transition: TransitionKind,
    /// Text to show.
    pub message: String,
}

impl Notification {
    /// Describe a failed transition, preferring the server's own message.
    pub fn failure(transition: TransitionKind, error: &ApiError) -> Self {
        let reason = error.server_message().unwrap_or(GENERIC_FAILURE);
        Self {
            transition,
            message: format!("Could not {} friend request: {}", transition.verb(), reason),
        }
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    /// Show `notification` to the user.
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::warn!("{}", notification.message);
    }
}

/// Queues notifications for a UI loop.
impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("Notification dropped, receiver gone");
        }
    }
}
