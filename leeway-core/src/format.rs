//! Display formatting helpers.
//!
//! Pure functions shared by the notification engine and the front ends.

use chrono::{DateTime, Utc};

/// Default maximum length of an error shown to the user.
pub const DEFAULT_ERROR_DISPLAY_LEN: usize = 120;

/// Placeholder shown when a value is absent.
pub const PLACEHOLDER: &str = "\u{2014}";

const ELLIPSIS: &str = "...";

/// Formats the time until `resets_at` as a countdown.
///
/// Returns `"now"` once the instant has passed, otherwise the largest
/// fitting breakdown: `"2d 5h 17m"`, `"3h 15m"`, `"12m"`, or `"< 1m"`.
pub fn format_reset(resets_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total_seconds = (resets_at - now).num_seconds();
    if total_seconds <= 0 {
        return "now".to_string();
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;

    if hours >= 24 {
        format!("{}d {}h {}m", hours / 24, hours % 24, minutes)
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        "< 1m".to_string()
    }
}

/// Like [`format_reset`], with [`PLACEHOLDER`] for an unknown instant.
pub fn format_reset_opt(resets_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    resets_at.map_or_else(|| PLACEHOLDER.to_string(), |at| format_reset(at, now))
}

/// Truncates `message` to at most `max_len` characters.
///
/// A truncated message ends in `"..."` and is exactly `max_len` long.
pub fn truncate_error(message: &str, max_len: usize) -> String {
    if message.chars().count() <= max_len {
        return message.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = message.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
