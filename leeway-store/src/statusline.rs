//! Claude Code statusline integration.
//!
//! Installs a shell script that Claude Code runs to render its status line,
//! and points the `statusLine` key of Claude Code's `settings.json` at it:
//!
//! ```json
//! { "statusLine": { "type": "command", "command": "/home/me/.claude/statusline-command.sh" } }
//! ```
//!
//! Every other key of the settings file is preserved in its original order.
//! Writes are atomic, and a settings path that is a symlink is written
//! through to its target so the link survives.

use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::error::StatuslineError;
use crate::persistence::write_atomic;

// ============================================================================
// Constants
// ============================================================================

/// File name of the installed script.
pub const STATUSLINE_SCRIPT_NAME: &str = "statusline-command.sh";

/// Key in Claude Code's settings that configures the status line.
pub const STATUSLINE_KEY: &str = "statusLine";

const SCRIPT_MODE: u32 = 0o755;
const SETTINGS_MODE: u32 = 0o644;

const STATUSLINE_SCRIPT: &str = include_str!("../assets/statusline-command.sh");

// ============================================================================
// Paths
// ============================================================================

fn claude_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude"))
}

/// Default install location of the script (`~/.claude/statusline-command.sh`).
pub fn default_script_path() -> Option<PathBuf> {
    claude_dir().map(|d| d.join(STATUSLINE_SCRIPT_NAME))
}

/// Default Claude Code settings file (`~/.claude/settings.json`).
pub fn default_claude_settings_path() -> Option<PathBuf> {
    claude_dir().map(|d| d.join("settings.json"))
}

// ============================================================================
// Script
// ============================================================================

/// Returns the statusline script.
///
/// The script reads `~/.claude/.credentials.json`, queries the usage
/// endpoint, and prints a 256-colour gradient bar. The token and the
/// response are passed to `python3` on stdin, never interpolated into a
/// command line.
pub fn generate_statusline_script() -> &'static str {
    STATUSLINE_SCRIPT
}

// ============================================================================
// Install / Uninstall
// ============================================================================

/// Writes the script and points Claude Code's `statusLine` at it.
///
/// The settings file is validated before anything is written, so a broken
/// symlink or corrupt settings file leaves the filesystem untouched.
/// Installing twice yields the same result as installing once.
///
/// # Errors
///
/// - [`StatuslineError::BrokenSymlink`] if either path is a dangling link
/// - [`StatuslineError::CorruptSettings`] if the settings are not a JSON object
/// - [`StatuslineError::Io`] for other filesystem failures
#[instrument(skip_all, fields(script = %script_path.display(), settings = %settings_path.display()))]
pub async fn install(script_path: &Path, settings_path: &Path) -> Result<(), StatuslineError> {
    let settings_target = resolve_write_target(settings_path).await?;
    let settings = read_settings(&settings_target).await?;
    let command = script_command(script_path)?;
    let script_target = resolve_write_target(script_path).await?;

    create_parent_dirs(&script_target).await?;
    write_atomic(&script_target, STATUSLINE_SCRIPT.as_bytes(), SCRIPT_MODE).await?;
    debug!(path = %script_target.display(), "Wrote statusline script");

    set_statusline(&settings_target, settings.unwrap_or_default(), &command).await?;

    info!(command = %command, "Statusline installed");
    Ok(())
}

/// Removes the `statusLine` key and deletes the script.
///
/// Missing files and a missing key are not errors. The settings file is not
/// rewritten when it has no `statusLine` key.
///
/// # Errors
///
/// Same classification as [`install`].
#[instrument(skip_all, fields(script = %script_path.display(), settings = %settings_path.display()))]
pub async fn uninstall(script_path: &Path, settings_path: &Path) -> Result<(), StatuslineError> {
    remove_claude_code_settings(settings_path).await?;

    match tokio::fs::remove_file(script_path).await {
        Ok(()) => debug!("Removed statusline script"),
        Err(e) if e.kind() == ErrorKind::NotFound => debug!("Statusline script already absent"),
        Err(e) => return Err(e.into()),
    }

    info!("Statusline uninstalled");
    Ok(())
}

/// Sets `statusLine` in the settings file to run `script_path`.
///
/// Creates the file with only that key when it does not exist.
///
/// # Errors
///
/// Same classification as [`install`].
pub async fn update_claude_code_settings(
    settings_path: &Path,
    script_path: &Path,
) -> Result<(), StatuslineError> {
    let target = resolve_write_target(settings_path).await?;
    let map = read_settings(&target).await?.unwrap_or_default();
    let command = script_command(script_path)?;
    set_statusline(&target, map, &command).await
}

async fn set_statusline(
    target: &Path,
    mut map: Map<String, Value>,
    command: &str,
) -> Result<(), StatuslineError> {
    map.insert(STATUSLINE_KEY.to_string(), statusline_entry(command));
    write_settings(target, &map).await
}

/// Removes `statusLine` from the settings file, if present.
///
/// # Errors
///
/// Same classification as [`install`].
pub async fn remove_claude_code_settings(settings_path: &Path) -> Result<(), StatuslineError> {
    let target = resolve_write_target(settings_path).await?;
    let Some(mut map) = read_settings(&target).await? else {
        debug!("Settings file absent, nothing to remove");
        return Ok(());
    };
    if map.shift_remove(STATUSLINE_KEY).is_none() {
        debug!("No statusLine key, leaving settings untouched");
        return Ok(());
    }
    write_settings(&target, &map).await
}

// ============================================================================
// Status
// ============================================================================

/// Observed state of the statusline integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatuslineStatus {
    /// The script file exists.
    pub script_present: bool,
    /// The current `statusLine.command`, if any.
    pub configured_command: Option<String>,
    /// The command Leeway would install.
    pub expected_command: String,
}

impl StatuslineStatus {
    /// True when the script exists and Claude Code runs it.
    pub fn is_installed(&self) -> bool {
        self.script_present && self.configured_command.as_deref() == Some(&self.expected_command)
    }
}

/// Inspects the script and settings without modifying either.
///
/// # Errors
///
/// Same classification as [`install`].
pub async fn status(script_path: &Path, settings_path: &Path) -> Result<StatuslineStatus, StatuslineError> {
    let target = resolve_write_target(settings_path).await?;
    let configured_command = read_settings(&target).await?.and_then(|map| {
        map.get(STATUSLINE_KEY)
            .and_then(|entry| entry.get("command"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    Ok(StatuslineStatus {
        script_present: tokio::fs::try_exists(script_path).await?,
        configured_command,
        expected_command: script_command(script_path)?,
    })
}

/// Returns true if the statusline is installed at these paths.
///
/// Unreadable settings count as not installed.
pub async fn is_installed(script_path: &Path, settings_path: &Path) -> bool {
    status(script_path, settings_path)
        .await
        .is_ok_and(|s| s.is_installed())
}

// ============================================================================
// Helpers
// ============================================================================

fn statusline_entry(command: &str) -> Value {
    let mut entry = Map::new();
    entry.insert("type".to_string(), Value::String("command".to_string()));
    entry.insert("command".to_string(), Value::String(command.to_string()));
    Value::Object(entry)
}

fn script_command(script_path: &Path) -> Result<String, StatuslineError> {
    Ok(std::path::absolute(script_path)?
        .to_string_lossy()
        .into_owned())
}

/// Resolves the file a write to `path` should replace.
///
/// A valid symlink resolves to its target; a dangling one is an error.
async fn resolve_write_target(path: &Path) -> Result<PathBuf, StatuslineError> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.file_type().is_symlink() => match tokio::fs::canonicalize(path).await {
            Ok(target) => {
                debug!(link = %path.display(), target = %target.display(), "Writing through symlink");
                Ok(target)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StatuslineError::BrokenSymlink {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(e.into()),
        },
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e.into()),
    }
}

/// Reads the settings object; `None` when the file does not exist.
async fn read_settings(path: &Path) -> Result<Option<Map<String, Value>>, StatuslineError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StatuslineError::CorruptSettings {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_settings(path: &Path, map: &Map<String, Value>) -> Result<(), StatuslineError> {
    let mode = existing_mode(path).await?.unwrap_or(SETTINGS_MODE);
    create_parent_dirs(path).await?;

    let mut json = serde_json::to_string_pretty(map).map_err(std::io::Error::from)?;
    json.push('\n');
    write_atomic(path, json.as_bytes(), mode).await?;
    debug!(path = %path.display(), "Wrote Claude Code settings");
    Ok(())
}

#[cfg(unix)]
async fn existing_mode(path: &Path) -> std::io::Result<Option<u32>> {
    use std::os::unix::fs::PermissionsExt;

    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta.permissions().mode() & 0o7777)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(not(unix))]
async fn existing_mode(_path: &Path) -> std::io::Result<Option<u32>> {
    Ok(None)
}

async fn create_parent_dirs(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
