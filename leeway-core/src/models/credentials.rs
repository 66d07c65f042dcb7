//! OAuth credential view.

use chrono::{DateTime, Utc};
use std::fmt;

/// OAuth credentials as read from the Claude CLI credential store.
///
/// Read-only: Leeway never persists or refreshes these.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token for the usage endpoint.
    pub access_token: String,
    /// When the access token stops being valid.
    pub expires_at: DateTime<Utc>,
    /// Refresh token, if the store carries one.
    pub refresh_token: Option<String>,
    /// Subscription type (e.g. "max", "pro").
    pub subscription_type: Option<String>,
    /// Rate limit tier (e.g. "default_claude_max_5x").
    pub rate_limit_tier: Option<String>,
}

impl Credentials {
    /// Creates credentials with only the required fields.
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
            refresh_token: None,
            subscription_type: None,
            rate_limit_tier: None,
        }
    }

    /// Returns true if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("subscription_type", &self.subscription_type)
            .field("rate_limit_tier", &self.rate_limit_tier)
            .finish()
    }
}
