//! Engine Events
//!
//! The state transitions stay pure and return events; dispatching
//! them to a sink is a separate, effectful step. This keeps the
//! machine deterministic and testable without a UI.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Severity of a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Positive outcome (win, bonus, unlock).
    Success,
    /// Rejected request or lost round.
    Error,
    /// Neutral information (insurance refund, cosmetics).
    Info,
}

/// Human-readable message for the notification sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Display severity.
    pub kind: Severity,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Success-severity message.
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: Severity::Success, message: message.into() }
    }

    /// Error-severity message.
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: Severity::Error, message: message.into() }
    }

    /// Info-severity message.
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: Severity::Info, message: message.into() }
    }
}

/// One-shot payload for the sharing UI when a win clears the big-win
/// threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BigWin {
    /// Payout, in credits.
    pub win_amount: u64,
    /// Final multiplier.
    pub multiplier: f64,
    /// Stake, in credits.
    pub bet_amount: u64,
}

/// Everything the engine emits toward the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Toast-style message for the notification sink.
    Notification(Notification),
    /// A win crossed the sharing threshold.
    BigWin(BigWin),
    /// An achievement was newly unlocked.
    AchievementUnlocked {
        /// Achievement id.
        id: String,
        /// Display name.
        name: String,
    },
}

/// Fire-and-forget consumer of notifications.
///
/// The sink displays and discards; no acknowledgment flows back.
pub trait NotificationSink {
    /// Display one message.
    fn notify(&mut self, notification: &Notification);
}

/// Sink that logs through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: &Notification) {
        match notification.kind {
            Severity::Error => warn!(target: "crashpoint::notify", "{}", notification.message),
            _ => info!(target: "crashpoint::notify", "{}", notification.message),
        }
    }
}

/// Sink that buffers messages, for tests.
#[derive(Clone, Debug, Default)]
pub struct BufferSink {
    /// Messages received so far, oldest first.
    pub messages: Vec<Notification>,
}

impl NotificationSink for BufferSink {
    fn notify(&mut self, notification: &Notification) {
        self.messages.push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Notification::success("hi")).unwrap();
        assert!(json.contains("\"success\""));
    }

    #[test]
    fn buffer_sink_keeps_order() {
        let mut sink = BufferSink::default();
        sink.notify(&Notification::success("first"));
        sink.notify(&Notification::error("second"));
        assert_eq!(sink.messages.len(), 2);
        assert_eq!(sink.messages[0].message, "first");
        assert_eq!(sink.messages[1].kind, Severity::Error);
    }
}
