//! HTTP client for the usage endpoint.
//!
//! # API Endpoint
//!
//! ```text
//! GET https://api.anthropic.com/api/oauth/usage
//! Authorization: Bearer <access_token>
//! anthropic-beta: oauth-2025-04-20
//! ```

use async_trait::async_trait;
use leeway_core::UsageData;
use reqwest::{Client, StatusCode, header};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;
use crate::parser::parse_response_body;
use crate::traits::UsageFetcher;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the Anthropic API.
pub const API_BASE_URL: &str = "https://api.anthropic.com";

/// Usage endpoint path.
pub const USAGE_ENDPOINT: &str = "/api/oauth/usage";

/// Value of the `anthropic-beta` header required for OAuth tokens.
pub const ANTHROPIC_BETA: &str = "oauth-2025-04-20";

/// User agent string for Leeway.
pub const USER_AGENT: &str = concat!("leeway/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Idle keep-alive connections are dropped after this long, so a connection
/// is never reused after sitting through a full refresh interval.
const POOL_IDLE_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Usage Client
// ============================================================================

/// Process-scoped HTTP client for the usage endpoint.
///
/// The underlying connection pool lives between [`UsageClient::open`] and
/// [`UsageClient::close`]; fetching while closed fails with
/// [`FetchError::Client`].
#[derive(Debug)]
pub struct UsageClient {
    inner: RwLock<Option<Client>>,
    base_url: String,
    timeout: Duration,
}

impl Default for UsageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageClient {
    /// Creates a closed client pointed at the production API.
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    /// Creates a closed client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(None),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates and opens a client in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect() -> Result<Self, FetchError> {
        let client = Self::new();
        client.open()?;
        Ok(client)
    }

    /// Builds the connection pool. Opening an open client is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the TLS backend cannot be initialised.
    pub fn open(&self) -> Result<(), FetchError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            let client = Client::builder()
                .timeout(self.timeout)
                .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
                .build()?;
            *guard = Some(client);
            debug!(base_url = %self.base_url, "Usage client opened");
        }
        Ok(())
    }

    /// Drops the connection pool. Requests already in flight finish on their
    /// own handle.
    pub fn close(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("Usage client closed");
        }
    }

    /// Returns true while the client is open.
    pub fn is_open(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Full URL of the usage endpoint.
    pub fn usage_url(&self) -> String {
        format!("{}{}", self.base_url, USAGE_ENDPOINT)
    }

    fn client(&self) -> Result<Client, FetchError> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(FetchError::Client)
    }

    async fn request(&self, client: &Client, token: &str) -> Result<UsageData, FetchError> {
        let url = self.usage_url();
        debug!(url = %url, "Fetching usage");

        let mut request = client.get(&url);
        for (name, value) in build_request_headers(token) {
            request = request.header(name, value);
        }
        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, "Usage request failed");
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        debug!(len = body.len(), "Received usage response");
        Ok(parse_response_body(&body)?)
    }
}

#[async_trait]
impl UsageFetcher for UsageClient {
    #[instrument(skip(self, token, cancel))]
    async fn fetch(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<UsageData, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        let client = self.client()?;

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Usage fetch cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.request(&client, token) => result,
        }
    }
}

/// Builds the request headers for the usage endpoint.
pub fn build_request_headers(token: &str) -> Vec<(header::HeaderName, String)> {
    vec![
        (header::AUTHORIZATION, format!("Bearer {token}")),
        (header::USER_AGENT, USER_AGENT.to_string()),
        (header::CONTENT_TYPE, "application/json".to_string()),
        (
            header::HeaderName::from_static("anthropic-beta"),
            ANTHROPIC_BETA.to_string(),
        ),
    ]
}

// ============================================================================
// Tests
// ============================================================================
