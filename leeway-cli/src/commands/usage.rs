//! Usage command - fetch and display current usage.

use anyhow::{Result, bail};
use chrono::Utc;
use leeway_engine::CREDENTIAL_EXPIRED_MESSAGE;
use leeway_fetch::{CredentialProvider, UsageClient, UsageFetcher};
use leeway_store::SettingsStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::credential_provider;
use crate::output::{JsonFormatter, TextFormatter, UsageOutput};
use crate::{Cli, OutputFormat};

/// Runs the usage command.
pub async fn run(store: &SettingsStore, cli: &Cli) -> Result<()> {
    let settings = store.get().await;
    let provider = credential_provider(&settings)?;
    debug!(path = %provider.path().display(), "Reading credentials");

    let credentials = provider.read().await?;
    if credentials.is_expired() {
        bail!(CREDENTIAL_EXPIRED_MESSAGE);
    }

    let client = UsageClient::connect()?;
    let result = client
        .fetch(&credentials.access_token, &CancellationToken::new())
        .await;
    client.close();
    let data = result?;

    info!(session = ?data.session_pct(), weekly = ?data.weekly_pct(), "Fetched usage");

    let now = Utc::now();
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.use_colors());
            println!("{}", formatter.format_usage(&data, now));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&UsageOutput::new(&data, now))?);
        }
    }

    Ok(())
}
