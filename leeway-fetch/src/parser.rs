//! Usage response parser.
//!
//! Tolerant decoding of the usage endpoint body:
//!
//! ```json
//! {
//!   "five_hour":      {"utilization_pct": 45.7, "utilization": 46, "resets_at": "2026-02-20T20:00:00Z"},
//!   "seven_day":      {"utilization": 62.0, "resets_at": "2026-02-23T00:00:00+00:00"},
//!   "seven_day_opus": null
//! }
//! ```
//!
//! Missing or malformed fields become "no data" for that bucket only.

use chrono::{DateTime, Utc};
use leeway_core::{UsageBucket, UsageData};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::ParseError;

// ============================================================================
// Constants
// ============================================================================

/// Key of the five-hour session bucket.
pub const SESSION_KEY: &str = "five_hour";

/// Key of the seven-day bucket.
pub const WEEKLY_KEY: &str = "seven_day";

/// Key of the seven-day Opus bucket.
pub const OPUS_KEY: &str = "seven_day_opus";

const PCT_FIELDS: [&str; 2] = ["utilization_pct", "utilization"];
const RESETS_AT_FIELD: &str = "resets_at";

// ============================================================================
// Parsing
// ============================================================================

/// Parses a decoded usage response into a [`UsageData`] snapshot.
///
/// Total: never fails. Absent, `null`, or non-object buckets yield an empty
/// bucket.
pub fn parse_usage_response(raw: &Map<String, Value>) -> UsageData {
    UsageData::new(
        parse_bucket(raw.get(SESSION_KEY)),
        parse_bucket(raw.get(WEEKLY_KEY)),
        parse_bucket(raw.get(OPUS_KEY)),
    )
}

/// Decodes a response body and parses it.
///
/// # Errors
///
/// Returns [`ParseError::InvalidJson`] if the body is not JSON and
/// [`ParseError::NotAnObject`] if it is JSON of any other shape.
pub fn parse_response_body(body: &str) -> Result<UsageData, ParseError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(map) = value else {
        return Err(ParseError::NotAnObject);
    };
    let data = parse_usage_response(&map);
    debug!(
        session = ?data.session_pct(),
        weekly = ?data.weekly_pct(),
        opus = ?data.opus_pct(),
        "Parsed usage response"
    );
    Ok(data)
}

fn parse_bucket(value: Option<&Value>) -> UsageBucket {
    let Some(Value::Object(bucket)) = value else {
        return UsageBucket::EMPTY;
    };

    UsageBucket {
        pct: parse_pct(bucket),
        resets_at: bucket
            .get(RESETS_AT_FIELD)
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
    }
}

/// First usable percentage, `utilization_pct` before `utilization`.
fn parse_pct(bucket: &Map<String, Value>) -> Option<f64> {
    PCT_FIELDS.iter().find_map(|field| {
        let pct = bucket.get(*field)?.as_f64()?;
        if pct.is_finite() && pct >= 0.0 {
            Some(pct)
        } else {
            trace!(field = *field, pct, "Ignoring invalid utilization");
            None
        }
    })
}

/// Parses an ISO-8601 timestamp that carries an explicit offset.
///
/// Values without an offset are rejected.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| trace!(value, error = %e, "Ignoring unparseable timestamp"))
        .ok()
}

// ============================================================================
// Tests
// ============================================================================
