//! Desktop notification sink.
//!
//! Shells out to `notify-send` (Linux) or `osascript` (macOS). Missing tools
//! are logged once and otherwise ignored; the watch loop keeps printing.

use std::path::PathBuf;

use leeway_core::NotificationEvent;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Application name passed to the notification daemon.
const APP_NAME: &str = "Leeway";

/// Which backend delivers notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopNotifier {
    /// freedesktop `notify-send`.
    NotifySend(PathBuf),
    /// AppleScript `display notification`.
    Osascript(PathBuf),
    /// No backend found.
    Disabled,
}

impl DesktopNotifier {
    /// Picks the backend available on this machine.
    pub fn detect() -> Self {
        let notifier = if cfg!(target_os = "macos") {
            which::which("osascript").map_or(Self::Disabled, Self::Osascript)
        } else {
            which::which("notify-send").map_or(Self::Disabled, Self::NotifySend)
        };
        if notifier == Self::Disabled {
            warn!("No desktop notification tool found; notifications will only be printed");
        }
        notifier
    }

    /// Sends `event` without waiting for the tool to exit.
    pub fn send(&self, event: &NotificationEvent) {
        let mut command = match self {
            Self::NotifySend(path) => {
                let mut command = Command::new(path);
                command.args(notify_send_args(event));
                command
            }
            Self::Osascript(path) => {
                let mut command = Command::new(path);
                command.args(["-e", &applescript(event)]);
                command
            }
            Self::Disabled => return,
        };

        info!(id = %event.id(), threshold = event.threshold, "Sending desktop notification");
        match command.kill_on_drop(false).spawn() {
            Ok(mut child) => {
                tokio::spawn(async move {
                    if let Err(e) = child.wait().await {
                        debug!(error = %e, "Notification tool did not exit cleanly");
                    }
                });
            }
            Err(e) => warn!(error = %e, "Failed to send desktop notification"),
        }
    }
}

/// `notify-send` arguments. The event id doubles as the replace hint, so a
/// repeated threshold replaces its previous bubble.
fn notify_send_args(event: &NotificationEvent) -> Vec<String> {
    vec![
        "--app-name".to_string(),
        APP_NAME.to_string(),
        "--hint".to_string(),
        format!("string:x-canonical-private-synchronous:{}", event.id()),
        event.title(),
        event.body(),
    ]
}

/// AppleScript for `osascript -e`, with quotes escaped.
fn applescript(event: &NotificationEvent) -> String {
    format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(&event.body()),
        escape_applescript(&event.title())
    )
}

fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}
