//! Seams between the refresh engine and the outside world.
//!
//! The engine only talks to these traits, so tests can substitute scripted
//! fakes for the credential file and the network.

use async_trait::async_trait;
use leeway_core::{Credentials, UsageData};
use tokio_util::sync::CancellationToken;

use crate::error::{CredentialError, FetchError};

/// Source of OAuth credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Reads the current credentials.
    async fn read(&self) -> Result<Credentials, CredentialError>;
}

/// Fetches one usage snapshot.
#[async_trait]
pub trait UsageFetcher: Send + Sync {
    /// Fetches usage with `token`.
    ///
    /// Must return [`FetchError::Cancelled`] promptly once `cancel` fires.
    async fn fetch(&self, token: &str, cancel: &CancellationToken)
    -> Result<UsageData, FetchError>;
}
