//! Text output formatting with progress bars and colors.

use chrono::{DateTime, Utc};
use leeway_core::{PLACEHOLDER, StatusLevel, UsageBucket, UsageData, format_reset};
use leeway_engine::{EngineEvent, RefreshOutcome};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Formats a usage snapshot, one line per bucket.
    pub fn format_usage(&self, data: &UsageData, now: DateTime<Utc>) -> String {
        if !data.has_data() {
            return self.dim("No usage data available");
        }

        [
            ("Session", &data.session),
            ("Weekly", &data.weekly),
            ("Opus", &data.opus),
        ]
        .into_iter()
        .map(|(label, bucket)| self.format_bucket(label, bucket, now))
        .collect::<Vec<_>>()
        .join("\n")
    }

    /// Formats one bucket: label, bar, percentage, countdown.
    fn format_bucket(&self, label: &str, bucket: &UsageBucket, now: DateTime<Utc>) -> String {
        let label = format!("{label}:");
        let Some(pct) = bucket.pct else {
            return format!("{label:<8} {}", self.dim(PLACEHOLDER));
        };

        let status = bucket.status();
        let mut line = format!(
            "{label:<8} {} {}",
            self.progress_bar(pct, status),
            self.colorize(status, &format!("{pct:>3.0}%"))
        );

        if let Some(resets_at) = bucket.effective_resets_at() {
            let countdown = format_reset(resets_at, now);
            let text = if countdown == "now" {
                "resets now".to_string()
            } else {
                format!("resets in {countdown}")
            };
            line.push_str(&format!("  {}", self.dim(&text)));
        }

        line
    }

    /// Formats a progress bar filled to `pct` (clamped to 0-100).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn progress_bar(&self, pct: f64, status: StatusLevel) -> String {
        let fraction = pct.clamp(0.0, 100.0) / 100.0;
        let filled = (fraction * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.colorize(status, &bar)
    }

    /// Formats one engine event for the watch log.
    pub fn format_event(&self, event: &EngineEvent, now: DateTime<Utc>) -> String {
        match event {
            EngineEvent::Refreshing => self.dim("Refreshing..."),
            EngineEvent::ScheduleChanged { interval } => {
                format!("Refreshing every {}s", interval.as_secs())
            }
            EngineEvent::Refresh(RefreshOutcome::Success(data)) => {
                format!("Usage updated\n{}", self.format_usage(data, now))
            }
            EngineEvent::Refresh(outcome) => outcome
                .error_message()
                .map(|message| self.red(&message))
                .unwrap_or_default(),
            EngineEvent::Notification(notification) => format!(
                "{} {}",
                self.bold(&notification.title()),
                notification.body()
            ),
        }
    }

    // ========================================================================
    // Color helpers
    // ========================================================================

    fn colorize(&self, status: StatusLevel, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[38;5;{}m{text}{RESET}", status.ansi256())
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.wrap(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.wrap(DIM, text)
    }

    fn red(&self, text: &str) -> String {
        self.wrap(RED, text)
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
