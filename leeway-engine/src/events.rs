//! Events the engine emits to its presentation layer.

use leeway_core::{NotificationEvent, UsageData};
use std::time::Duration;

/// Message shown when the OAuth token has expired.
pub const CREDENTIAL_EXPIRED_MESSAGE: &str =
    "OAuth token has expired. Re-authenticate via Claude Code CLI.";

/// Result of one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Fresh usage data.
    Success(UsageData),
    /// The cycle failed; the message is already truncated for display.
    Failure(String),
    /// The stored token has expired; no request was sent.
    CredentialExpired,
}

impl RefreshOutcome {
    /// The user-facing error line, if this outcome is an error.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(format!("Error: {message}")),
            Self::CredentialExpired => Some(format!("Error: {CREDENTIAL_EXPIRED_MESSAGE}")),
        }
    }
}

/// Everything the refresh controller reports.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A refresh cycle started.
    Refreshing,
    /// The periodic timer was (re)armed.
    ScheduleChanged {
        /// Effective, clamped interval.
        interval: Duration,
    },
    /// A refresh cycle finished.
    Refresh(RefreshOutcome),
    /// A notification threshold was crossed.
    Notification(NotificationEvent),
}
