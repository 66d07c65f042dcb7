//! Notification payload.

use serde::{Deserialize, Serialize};

/// A threshold-crossing notification, ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// The threshold that was crossed (e.g. 75).
    pub threshold: u8,
    /// Session utilization at the time of the crossing.
    pub session_pct: f64,
    /// Human-readable countdown to the session reset (`"now"`, `"2h 3m"`, `"—"`).
    pub reset_description: String,
}

impl NotificationEvent {
    /// Stable identifier, so a re-sent notification replaces the previous one.
    pub fn id(&self) -> String {
        format!("threshold-{}", self.threshold)
    }

    /// Notification title, e.g. `"Leeway: 76 %"`.
    pub fn title(&self) -> String {
        format!("Leeway: {:.0} %", self.session_pct)
    }

    /// Notification body.
    ///
    /// The reset sentence is omitted when the reset instant is unknown.
    pub fn body(&self) -> String {
        let head = format!("Session usage has reached {} %.", self.threshold);
        match self.reset_description.as_str() {
            "now" => format!("{head} Resets now."),
            crate::format::PLACEHOLDER => head,
            other => format!("{head} Resets in {other}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(reset: &str) -> NotificationEvent {
        NotificationEvent {
            threshold: 75,
            session_pct: 76.4,
            reset_description: reset.to_string(),
        }
    }

    #[test]
    fn test_id() {
        assert_eq!(event("now").id(), "threshold-75");
    }

    #[test]
    fn test_title_rounds_pct() {
        assert_eq!(event("2h 3m").title(), "Leeway: 76 %");
    }

    #[test]
    fn test_body_with_countdown() {
        assert_eq!(
            event("2h 3m").body(),
            "Session usage has reached 75 %. Resets in 2h 3m."
        );
    }

    #[test]
    fn test_body_resets_now() {
        assert_eq!(
            event("now").body(),
            "Session usage has reached 75 %. Resets now."
        );
    }

    #[test]
    fn test_body_unknown_reset() {
        assert_eq!(
            event(crate::format::PLACEHOLDER).body(),
            "Session usage has reached 75 %."
        );
    }
}
