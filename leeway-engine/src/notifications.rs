//! Session quota notifications.
//!
//! Each enabled threshold fires at most once per session epoch. An epoch
//! ends when session usage drops below [`CLEAR_BELOW_PCT`], which happens
//! after the five-hour window resets.

use chrono::{DateTime, Utc};
use leeway_core::{NotificationEvent, UsageData, format_reset_opt};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Session usage below this starts a new epoch.
pub const CLEAR_BELOW_PCT: f64 = 50.0;

/// Thresholds already notified in the current epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    fired: BTreeSet<u8>,
}

impl NotificationState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `threshold` already fired this epoch.
    pub fn has_fired(&self, threshold: u8) -> bool {
        self.fired.contains(&threshold)
    }

    /// Thresholds fired this epoch, ascending.
    pub fn fired(&self) -> impl Iterator<Item = u8> + '_ {
        self.fired.iter().copied()
    }

    /// Starts a new epoch.
    pub fn clear(&mut self) {
        self.fired.clear();
    }
}

/// Evaluates one snapshot against the enabled thresholds.
///
/// Only the session bucket drives notifications. Thresholds are checked in
/// ascending order regardless of input order, and duplicates count once.
/// The state is untouched when the session percentage is absent.
pub fn evaluate(
    data: &UsageData,
    thresholds: &[u8],
    state: &mut NotificationState,
    now: DateTime<Utc>,
) -> Vec<NotificationEvent> {
    let Some(pct) = data.session_pct() else {
        return Vec::new();
    };

    let ordered: BTreeSet<u8> = thresholds.iter().copied().collect();
    let mut events = Vec::new();
    for threshold in ordered {
        if pct >= f64::from(threshold) && state.fired.insert(threshold) {
            info!(threshold, pct, "Session threshold crossed");
            events.push(NotificationEvent {
                threshold,
                session_pct: pct,
                reset_description: format_reset_opt(data.session.effective_resets_at(), now),
            });
        }
    }

    if pct < CLEAR_BELOW_PCT && !state.fired.is_empty() {
        debug!(pct, "Session usage dropped, clearing notification state");
        state.clear();
    }

    events
}
