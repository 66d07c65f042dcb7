//! Usage-related types.
//!
//! This module contains the parsed shape of the usage endpoint:
//! - [`UsageData`] - Immutable snapshot with session, weekly, and opus buckets
//! - [`UsageBucket`] - One utilization percentage with its reset instant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StatusLevel;
use crate::error::CoreError;

// ============================================================================
// Usage Bucket
// ============================================================================

/// A single usage window (session, weekly, or opus).
///
/// The reset instant is only meaningful while a percentage is present; use
/// [`UsageBucket::effective_resets_at`] wherever the instant is displayed or
/// acted upon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageBucket {
    /// Percentage of the quota used, `>= 0`.
    pub pct: Option<f64>,
    /// When this window resets.
    pub resets_at: Option<DateTime<Utc>>,
}

impl UsageBucket {
    /// A bucket with no data.
    pub const EMPTY: Self = Self {
        pct: None,
        resets_at: None,
    };

    /// Creates a bucket, validating the percentage.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if `pct` is negative or not finite.
    pub fn new(pct: Option<f64>, resets_at: Option<DateTime<Utc>>) -> Result<Self, CoreError> {
        if let Some(value) = pct {
            if !value.is_finite() {
                return Err(CoreError::InvalidData(
                    "utilization is not a finite number".to_string(),
                ));
            }
            if value < 0.0 {
                return Err(CoreError::InvalidData(format!(
                    "utilization {value} is negative"
                )));
            }
        }
        Ok(Self { pct, resets_at })
    }

    /// Returns true if a percentage is present.
    pub fn has_data(&self) -> bool {
        self.pct.is_some()
    }

    /// The reset instant, but only when a percentage accompanies it.
    pub fn effective_resets_at(&self) -> Option<DateTime<Utc>> {
        self.pct.and(self.resets_at)
    }

    /// Colour/status level for this bucket.
    pub fn status(&self) -> StatusLevel {
        StatusLevel::for_pct(self.pct)
    }
}

// ============================================================================
// Usage Data
// ============================================================================

/// Parsed usage snapshot.
///
/// Produced fresh on every successful fetch and never mutated; the next
/// snapshot replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageData {
    /// Five-hour session window.
    pub session: UsageBucket,
    /// Seven-day window across all models.
    pub weekly: UsageBucket,
    /// Seven-day Opus window.
    pub opus: UsageBucket,
}

impl UsageData {
    /// Creates a snapshot from its three buckets.
    pub fn new(session: UsageBucket, weekly: UsageBucket, opus: UsageBucket) -> Self {
        Self {
            session,
            weekly,
            opus,
        }
    }

    /// Session utilization percentage.
    pub fn session_pct(&self) -> Option<f64> {
        self.session.pct
    }

    /// Session reset instant.
    pub fn session_resets_at(&self) -> Option<DateTime<Utc>> {
        self.session.resets_at
    }

    /// Weekly utilization percentage.
    pub fn weekly_pct(&self) -> Option<f64> {
        self.weekly.pct
    }

    /// Weekly reset instant.
    pub fn weekly_resets_at(&self) -> Option<DateTime<Utc>> {
        self.weekly.resets_at
    }

    /// Opus utilization percentage.
    pub fn opus_pct(&self) -> Option<f64> {
        self.opus.pct
    }

    /// Opus reset instant.
    pub fn opus_resets_at(&self) -> Option<DateTime<Utc>> {
        self.opus.resets_at
    }

    /// Returns true if any bucket carries a percentage.
    pub fn has_data(&self) -> bool {
        self.session.has_data() || self.weekly.has_data() || self.opus.has_data()
    }

    /// Returns the highest percentage across all buckets.
    pub fn max_pct(&self) -> Option<f64> {
        [self.session.pct, self.weekly.pct, self.opus.pct]
            .into_iter()
            .flatten()
            .reduce(f64::max)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reset() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 20, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_bucket_rejects_negative() {
        assert!(UsageBucket::new(Some(-1.0), None).is_err());
        assert!(UsageBucket::new(Some(f64::NAN), None).is_err());
        assert!(UsageBucket::new(Some(0.0), None).is_ok());
        assert!(UsageBucket::new(Some(140.0), None).is_ok());
    }

    #[test]
    fn test_effective_resets_at_requires_pct() {
        let orphan = UsageBucket {
            pct: None,
            resets_at: Some(reset()),
        };
        assert_eq!(orphan.effective_resets_at(), None);

        let bucket = UsageBucket {
            pct: Some(12.0),
            resets_at: Some(reset()),
        };
        assert_eq!(bucket.effective_resets_at(), Some(reset()));
    }

    #[test]
    fn test_has_data() {
        assert!(!UsageData::default().has_data());

        let data = UsageData {
            opus: UsageBucket {
                pct: Some(3.0),
                resets_at: None,
            },
            ..Default::default()
        };
        assert!(data.has_data());
    }

    #[test]
    fn test_max_pct() {
        let data = UsageData::new(
            UsageBucket::new(Some(45.0), None).unwrap(),
            UsageBucket::new(Some(62.5), None).unwrap(),
            UsageBucket::EMPTY,
        );
        assert_eq!(data.max_pct(), Some(62.5));
        assert_eq!(UsageData::default().max_pct(), None);
    }

    #[test]
    fn test_accessors() {
        let data = UsageData::new(
            UsageBucket::new(Some(45.0), Some(reset())).unwrap(),
            UsageBucket::EMPTY,
            UsageBucket::EMPTY,
        );
        assert_eq!(data.session_pct(), Some(45.0));
        assert_eq!(data.session_resets_at(), Some(reset()));
        assert_eq!(data.weekly_pct(), None);
        assert_eq!(data.opus_resets_at(), None);
    }
}
