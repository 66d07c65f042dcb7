//! Fetch error types.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Credential Error
// ============================================================================

/// Error reading the OAuth credential store.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The credentials file does not exist.
    #[error("Credentials file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The credentials file could not be read.
    #[error("Failed to read credentials: {0}")]
    Io(#[from] std::io::Error),

    /// The credentials file is not valid JSON.
    #[error("Failed to parse credentials: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The file has no `claudeAiOauth` section.
    #[error("Missing 'claudeAiOauth' key in credentials file")]
    MissingOAuth,

    /// The OAuth section has no `accessToken`.
    #[error("Missing 'accessToken' in claudeAiOauth")]
    MissingAccessToken,

    /// The home directory could not be determined.
    #[error("Could not determine home directory")]
    NoHomeDir,
}

// ============================================================================
// Parse Error
// ============================================================================

/// Error decoding a usage response body.
///
/// Distinct from a valid response that simply carries no data.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not valid JSON.
    #[error("Failed to parse API response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body is JSON but not an object.
    #[error("Failed to parse API response: expected JSON object")]
    NotAnObject,
}

// ============================================================================
// Fetch Error
// ============================================================================

/// Error type for usage fetches.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-200 status.
    #[error("API returned {code}: {reason}")]
    Status {
        /// Numeric HTTP status.
        code: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The response body could not be decoded.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The fetch was cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The client is not open.
    #[error("HTTP client is not open")]
    Client,
}

impl FetchError {
    /// Returns true for the cancellation outcome, which callers drop silently.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
