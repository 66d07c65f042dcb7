//! Integration tests for the statusline installer.

use std::path::{Path, PathBuf};

use leeway_store::StatuslineError;
use leeway_store::statusline::{self, STATUSLINE_SCRIPT_NAME};
use serde_json::{Value, json};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn settings(&self) -> PathBuf {
        self.dir.path().join("settings.json")
    }

    fn script(&self) -> PathBuf {
        self.dir.path().join(STATUSLINE_SCRIPT_NAME)
    }

    fn write_settings(&self, value: &str) {
        std::fs::write(self.settings(), value).unwrap();
    }

    fn read_json(&self, path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }
}

#[tokio::test]
async fn test_install_creates_settings_file() {
    let fx = Fixture::new();

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    let data = fx.read_json(&fx.settings());
    assert_eq!(data["statusLine"]["type"], "command");
    assert_eq!(
        data["statusLine"]["command"],
        fx.script().to_string_lossy().as_ref()
    );
    assert_eq!(data.as_object().unwrap().len(), 1);
    assert!(
        std::fs::read_to_string(fx.script())
            .unwrap()
            .starts_with("#!/bin/bash")
    );
}

#[tokio::test]
async fn test_install_preserves_keys_and_order() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"zeta": 1, "alpha": {"nested": true}, "model": "opus"}"#);

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    let data = fx.read_json(&fx.settings());
    let keys: Vec<&str> = data.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "model", "statusLine"]);
    assert_eq!(data["alpha"], json!({"nested": true}));
}

#[tokio::test]
async fn test_install_overwrites_existing_statusline() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"statusLine": {"type": "command", "command": "old-command"}, "x": 1}"#);

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    let data = fx.read_json(&fx.settings());
    let keys: Vec<&str> = data.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["statusLine", "x"]);
    assert_eq!(
        data["statusLine"]["command"],
        fx.script().to_string_lossy().as_ref()
    );
}

#[tokio::test]
async fn test_install_is_idempotent() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"theme": "dark"}"#);

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();
    let first = std::fs::read_to_string(fx.settings()).unwrap();
    statusline::install(&fx.script(), &fx.settings()).await.unwrap();
    let second = std::fs::read_to_string(fx.settings()).unwrap();

    assert_eq!(first, second);
    assert!(statusline::is_installed(&fx.script(), &fx.settings()).await);
}

#[tokio::test]
async fn test_install_creates_parent_dirs() {
    let fx = Fixture::new();
    let script = fx.dir.path().join("a").join("b").join(STATUSLINE_SCRIPT_NAME);
    let settings = fx.dir.path().join("c").join("settings.json");

    statusline::install(&script, &settings).await.unwrap();

    assert!(script.exists());
    assert!(settings.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let fx = Fixture::new();
    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    let mode = std::fs::metadata(fx.script()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o755);
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_preserves_settings_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let fx = Fixture::new();
    fx.write_settings("{}");
    std::fs::set_permissions(fx.settings(), std::fs::Permissions::from_mode(0o600)).unwrap();

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    let mode = std::fs::metadata(fx.settings()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[tokio::test]
async fn test_install_corrupt_settings_untouched() {
    let fx = Fixture::new();
    fx.write_settings("{ this is not json");

    let err = statusline::install(&fx.script(), &fx.settings())
        .await
        .unwrap_err();

    assert!(matches!(err, StatuslineError::CorruptSettings { .. }));
    assert_eq!(
        std::fs::read_to_string(fx.settings()).unwrap(),
        "{ this is not json"
    );
    assert!(!fx.script().exists());
}

#[tokio::test]
async fn test_install_preserves_number_text() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"big": 12345678901234567890123, "dec": 1.10, "exp": 1e3}"#);

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    let written = std::fs::read_to_string(fx.settings()).unwrap();
    assert!(written.contains(r#""big": 12345678901234567890123"#));
    assert!(written.contains(r#""dec": 1.10"#));
    assert!(written.contains(r#""exp": 1e3"#));
    assert!(written.contains("statusLine"));
}

#[tokio::test]
async fn test_install_accepts_out_of_range_number() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"x": 1e400}"#);

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    let written = std::fs::read_to_string(fx.settings()).unwrap();
    assert!(written.contains(r#""x": 1e400"#));
    assert!(fx.script().exists());
}

#[tokio::test]
async fn test_install_non_object_settings_is_corrupt() {
    let fx = Fixture::new();
    fx.write_settings("[1, 2, 3]");

    let err = statusline::install(&fx.script(), &fx.settings())
        .await
        .unwrap_err();

    assert!(matches!(err, StatuslineError::CorruptSettings { .. }));
    assert_eq!(std::fs::read_to_string(fx.settings()).unwrap(), "[1, 2, 3]");
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_broken_symlink() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("elsewhere").join("settings.json");
    std::os::unix::fs::symlink(&missing, fx.settings()).unwrap();

    let err = statusline::install(&fx.script(), &fx.settings())
        .await
        .unwrap_err();

    assert!(matches!(err, StatuslineError::BrokenSymlink { .. }));
    assert!(!missing.exists());
    assert!(!fx.script().exists());
    assert!(
        std::fs::symlink_metadata(fx.settings())
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_writes_through_symlink() {
    let fx = Fixture::new();
    let real = fx.dir.path().join("dotfiles-settings.json");
    std::fs::write(&real, r#"{"keep": true}"#).unwrap();
    std::os::unix::fs::symlink(&real, fx.settings()).unwrap();

    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    assert!(
        std::fs::symlink_metadata(fx.settings())
            .unwrap()
            .file_type()
            .is_symlink()
    );
    let data = fx.read_json(&real);
    assert_eq!(data["keep"], true);
    assert_eq!(data["statusLine"]["type"], "command");
}

#[tokio::test]
async fn test_uninstall_removes_key_and_script() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"a": 1, "b": 2}"#);
    statusline::install(&fx.script(), &fx.settings()).await.unwrap();

    statusline::uninstall(&fx.script(), &fx.settings()).await.unwrap();

    assert_eq!(fx.read_json(&fx.settings()), json!({"a": 1, "b": 2}));
    assert!(!fx.script().exists());
    assert!(!statusline::is_installed(&fx.script(), &fx.settings()).await);
}

#[tokio::test]
async fn test_uninstall_keeps_key_order() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"first": 1, "statusLine": {"type": "command", "command": "x"}, "second": 2, "third": 3}"#);

    statusline::remove_claude_code_settings(&fx.settings()).await.unwrap();

    let data = fx.read_json(&fx.settings());
    let keys: Vec<&str> = data.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["first", "second", "third"]);
}

#[tokio::test]
async fn test_uninstall_noop_without_key() {
    let fx = Fixture::new();
    let original = "{\"otherKey\":42}";
    fx.write_settings(original);

    statusline::uninstall(&fx.script(), &fx.settings()).await.unwrap();

    assert_eq!(std::fs::read_to_string(fx.settings()).unwrap(), original);
}

#[tokio::test]
async fn test_uninstall_noop_on_empty_dir() {
    let fx = Fixture::new();

    statusline::uninstall(&fx.script(), &fx.settings()).await.unwrap();

    assert!(!fx.settings().exists());
    assert!(!fx.script().exists());
}

#[tokio::test]
async fn test_uninstall_corrupt_settings_untouched() {
    let fx = Fixture::new();
    statusline::install(&fx.script(), &fx.settings()).await.unwrap();
    fx.write_settings("{\"statusLine\": ");

    let err = statusline::uninstall(&fx.script(), &fx.settings())
        .await
        .unwrap_err();

    assert!(matches!(err, StatuslineError::CorruptSettings { .. }));
    assert_eq!(
        std::fs::read_to_string(fx.settings()).unwrap(),
        "{\"statusLine\": "
    );
    assert!(fx.script().exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_uninstall_broken_symlink() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("elsewhere").join("settings.json");
    std::os::unix::fs::symlink(&missing, fx.settings()).unwrap();

    let err = statusline::uninstall(&fx.script(), &fx.settings())
        .await
        .unwrap_err();

    assert!(matches!(err, StatuslineError::BrokenSymlink { .. }));
    assert!(!missing.exists());
    assert!(!missing.parent().unwrap().exists());
    assert_eq!(std::fs::read_link(fx.settings()).unwrap(), missing);
}

#[tokio::test]
async fn test_update_settings_directly() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"existingKey": "existingValue"}"#);

    statusline::update_claude_code_settings(&fx.settings(), &fx.script())
        .await
        .unwrap();

    let data = fx.read_json(&fx.settings());
    assert_eq!(data["existingKey"], "existingValue");
    assert_eq!(data["statusLine"]["type"], "command");
    assert!(!fx.script().exists());
}

#[tokio::test]
async fn test_status_reports_foreign_command() {
    let fx = Fixture::new();
    fx.write_settings(r#"{"statusLine": {"type": "command", "command": "other.sh"}}"#);
    std::fs::write(fx.script(), "#!/bin/bash\n").unwrap();

    let status = statusline::status(&fx.script(), &fx.settings()).await.unwrap();

    assert!(status.script_present);
    assert_eq!(status.configured_command.as_deref(), Some("other.sh"));
    assert!(!status.is_installed());
}
