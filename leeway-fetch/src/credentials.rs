//! OAuth credential file reader.
//!
//! The Claude CLI stores its OAuth credentials in `~/.claude/.credentials.json`:
//!
//! ```json
//! {
//!   "claudeAiOauth": {
//!     "accessToken": "sk-ant-oat01-...",
//!     "refreshToken": "sk-ant-ort01-...",
//!     "expiresAt": 1771617600000,
//!     "subscriptionType": "max",
//!     "rateLimitTier": "default_claude_max_5x"
//!   }
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use leeway_core::Credentials;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::CredentialError;
use crate::traits::CredentialProvider;

// ============================================================================
// Credentials File Structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile {
    claude_ai_oauth: Option<OAuthSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OAuthSection {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<f64>,
    subscription_type: Option<String>,
    rate_limit_tier: Option<String>,
}

// ============================================================================
// File Credential Provider
// ============================================================================

/// Reads credentials from the Claude CLI credentials file.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    /// Creates a provider reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a provider reading from the default location.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NoHomeDir`] if the home directory is unknown.
    pub fn with_default_path() -> Result<Self, CredentialError> {
        default_credentials_path()
            .map(Self::new)
            .ok_or(CredentialError::NoHomeDir)
    }

    /// The file this provider reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read(&self) -> Result<Credentials, CredentialError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let credentials = parse_credentials(&content)?;
        debug!(expires_at = %credentials.expires_at, "Read credentials");
        Ok(credentials)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Returns the default credentials file path.
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude").join(".credentials.json"))
}

/// Parses the contents of a credentials file.
///
/// `expiresAt` is epoch milliseconds and may be written as a float. A missing
/// or unrepresentable value reads as the epoch, so the token counts as expired.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or lacks the OAuth section or
/// its access token.
pub fn parse_credentials(json: &str) -> Result<Credentials, CredentialError> {
    let file: CredentialsFile = serde_json::from_str(json)?;
    let oauth = file.claude_ai_oauth.ok_or(CredentialError::MissingOAuth)?;
    let access_token = oauth
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(CredentialError::MissingAccessToken)?;

    Ok(Credentials {
        access_token,
        expires_at: expiry_from_millis(oauth.expires_at.unwrap_or(0.0)),
        refresh_token: oauth.refresh_token,
        subscription_type: oauth.subscription_type,
        rate_limit_tier: oauth.rate_limit_tier,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn expiry_from_millis(millis: f64) -> DateTime<Utc> {
    if !millis.is_finite() {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    Utc.timestamp_millis_opt(millis.trunc() as i64)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn write(dir: &tempfile::TempDir, value: &str) -> PathBuf {
        let path = dir.path().join(".credentials.json");
        std::fs::write(&path, value).unwrap();
        path
    }

    #[tokio::test]
    async fn test_reads_valid_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let expires = Utc::now() + Duration::hours(1);
        let body = json!({
            "claudeAiOauth": {
                "accessToken": "sk-ant-oat01-test-token",
                "refreshToken": "sk-ant-ort01-test-refresh",
                "expiresAt": expires.timestamp_millis(),
                "scopes": ["user:inference"],
                "subscriptionType": "max",
                "rateLimitTier": "default_claude_max_5x"
            }
        });
        let path = write(&dir, &body.to_string());

        let creds = FileCredentialProvider::new(path).read().await.unwrap();

        assert_eq!(creds.access_token, "sk-ant-oat01-test-token");
        assert_eq!(creds.refresh_token.as_deref(), Some("sk-ant-ort01-test-refresh"));
        assert_eq!(creds.subscription_type.as_deref(), Some("max"));
        assert_eq!(creds.rate_limit_tier.as_deref(), Some("default_claude_max_5x"));
        assert_eq!(creds.expires_at.timestamp_millis(), expires.timestamp_millis());
        assert!(!creds.is_expired());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nonexistent.json");
        let err = FileCredentialProvider::new(&path).read().await.unwrap_err();
        assert!(matches!(err, CredentialError::NotFound(p) if p == path));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_credentials("{not valid json").unwrap_err();
        assert!(matches!(err, CredentialError::InvalidJson(_)));
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_missing_oauth_key() {
        let err = parse_credentials(r#"{"someOtherKey": {}}"#).unwrap_err();
        assert!(matches!(err, CredentialError::MissingOAuth));
        assert!(err.to_string().contains("claudeAiOauth"));
    }

    #[test]
    fn test_missing_access_token() {
        let err = parse_credentials(r#"{"claudeAiOauth": {"refreshToken": "r"}}"#).unwrap_err();
        assert!(matches!(err, CredentialError::MissingAccessToken));
        assert!(err.to_string().contains("accessToken"));

        let err = parse_credentials(r#"{"claudeAiOauth": {"accessToken": ""}}"#).unwrap_err();
        assert!(matches!(err, CredentialError::MissingAccessToken));
    }

    #[test]
    fn test_expired_token() {
        let past = (Utc::now() - Duration::seconds(1)).timestamp_millis();
        let json = format!(r#"{{"claudeAiOauth": {{"accessToken": "t", "expiresAt": {past}}}}}"#);
        assert!(parse_credentials(&json).unwrap().is_expired());
    }

    #[test]
    fn test_missing_expiry_is_expired() {
        let creds = parse_credentials(r#"{"claudeAiOauth": {"accessToken": "t"}}"#).unwrap();
        assert_eq!(creds.expires_at, DateTime::<Utc>::UNIX_EPOCH);
        assert!(creds.is_expired());
    }

    #[test]
    fn test_small_timestamp_is_millis() {
        let creds =
            parse_credentials(r#"{"claudeAiOauth": {"accessToken": "t", "expiresAt": 1771617600}}"#)
                .unwrap();
        assert_eq!(creds.expires_at.timestamp_millis(), 1_771_617_600);
        assert!(creds.is_expired());
    }

    #[test]
    fn test_float_timestamp() {
        let creds = parse_credentials(
            r#"{"claudeAiOauth": {"accessToken": "t", "expiresAt": 1771617600000.0}}"#,
        )
        .unwrap();
        assert_eq!(creds.expires_at.timestamp(), 1_771_617_600);

        let creds =
            parse_credentials(r#"{"claudeAiOauth": {"accessToken": "t", "expiresAt": 1.7716176e12}}"#)
                .unwrap();
        assert_eq!(creds.expires_at.timestamp(), 1_771_617_600);
    }

    #[test]
    fn test_out_of_range_timestamp_is_epoch() {
        let creds =
            parse_credentials(r#"{"claudeAiOauth": {"accessToken": "t", "expiresAt": 1e300}}"#)
                .unwrap();
        assert_eq!(creds.expires_at, DateTime::<Utc>::UNIX_EPOCH);
    }
}
