//! CLI command implementations.

pub mod config;
pub mod statusline;
pub mod usage;
pub mod watch;

use anyhow::Result;
use leeway_fetch::FileCredentialProvider;
use leeway_store::Settings;

/// Builds the credential provider, honouring the settings override.
pub fn credential_provider(settings: &Settings) -> Result<FileCredentialProvider> {
    match &settings.credentials_path {
        Some(path) => Ok(FileCredentialProvider::new(path.clone())),
        None => Ok(FileCredentialProvider::with_default_path()?),
    }
}
