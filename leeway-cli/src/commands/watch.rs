//! Watch command - periodic refresh with desktop notifications.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Utc};
use leeway_engine::{EngineEvent, RefreshController, forward_interval_changes};
use leeway_fetch::UsageClient;
use leeway_store::SettingsStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use super::credential_provider;
use crate::Cli;
use crate::notify::DesktopNotifier;
use crate::output::TextFormatter;

/// A line typed while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchCommand {
    Refresh,
    SetInterval(u64),
    Quit,
    Empty,
}

fn parse_command(line: &str) -> Result<WatchCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(WatchCommand::Empty);
    };

    let command = match verb {
        "r" => WatchCommand::Refresh,
        "q" => WatchCommand::Quit,
        "i" => {
            let secs = parts.next().ok_or("Usage: i <seconds>")?;
            let secs = secs
                .parse()
                .map_err(|_| format!("Invalid interval: {secs}"))?;
            WatchCommand::SetInterval(secs)
        }
        other => return Err(format!("Unknown command: {other} (r, i <seconds>, q)")),
    };

    if parts.next().is_some() {
        return Err(format!("Unexpected arguments after '{verb}'"));
    }
    Ok(command)
}

/// Runs the watch command.
pub async fn run(store: Arc<SettingsStore>, cli: &Cli) -> Result<()> {
    let settings = store.get().await;
    let credentials = Arc::new(credential_provider(&settings)?);
    let client = Arc::new(UsageClient::connect()?);

    let (handle, mut events) = RefreshController::spawn(credentials, client.clone(), store.clone());
    let forwarder = forward_interval_changes(store.clone(), handle.clone());

    let formatter = TextFormatter::new(cli.use_colors());
    let notifier = DesktopNotifier::detect();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Starting watch mode");
    println!("Watching Claude usage. Commands: r = refresh, i <seconds> = set interval, q = quit");

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if let EngineEvent::Notification(notification) = &event {
                    notifier.send(notification);
                }
                let stamp = Local::now().format("%H:%M:%S");
                println!("[{stamp}] {}", formatter.format_event(&event, Utc::now()));
            }
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(WatchCommand::Refresh) => {
                        handle.refresh();
                    }
                    Ok(WatchCommand::SetInterval(secs)) => {
                        store.set_refresh_interval_secs(secs).await;
                        if let Err(e) = store.save().await {
                            warn!(error = %e, "Failed to save settings");
                            eprintln!("Error: {e}");
                        }
                    }
                    Ok(WatchCommand::Quit) => break,
                    Ok(WatchCommand::Empty) => {}
                    Err(message) => eprintln!("{message}"),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            },
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                }
                break;
            }
        }
    }

    info!("Stopping watch mode");
    handle.shutdown().await;
    forwarder.abort();
    client.close();
    Ok(())
}
