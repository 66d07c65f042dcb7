//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use leeway_core::{StatusLevel, UsageBucket, UsageData, format_reset};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for `leeway usage`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<WindowOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly: Option<WindowOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opus: Option<WindowOutput>,
    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl UsageOutput {
    /// Builds the output for a snapshot taken at `now`.
    pub fn new(data: &UsageData, now: DateTime<Utc>) -> Self {
        Self {
            session: WindowOutput::from_bucket(&data.session, now),
            weekly: WindowOutput::from_bucket(&data.weekly, now),
            opus: WindowOutput::from_bucket(&data.opus, now),
            updated_at: now,
        }
    }
}

/// A single usage window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOutput {
    pub used_percent: f64,
    pub status: StatusLevel,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub resets_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_in: Option<String>,
}

impl WindowOutput {
    /// `None` for a bucket without a percentage.
    fn from_bucket(bucket: &UsageBucket, now: DateTime<Utc>) -> Option<Self> {
        let used_percent = bucket.pct?;
        let resets_at = bucket.effective_resets_at();
        Some(Self {
            used_percent,
            status: bucket.status(),
            resets_at,
            resets_in: resets_at.map(|at| format_reset(at, now)),
        })
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
