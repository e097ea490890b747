//! Configuration helpers for the support agent
//!
//! Resolves the agent's state directory (~/.support-agent/ unless `TOKEN_DIR`
//! points elsewhere) and reads/writes the small JSON files kept there.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment variable overriding the state directory
pub const TOKEN_DIR_ENV: &str = "TOKEN_DIR";

/// Name of the state directory under the user's home
const STATE_DIR_NAME: &str = ".support-agent";

/// Get the default state directory (~/.support-agent/)
pub fn default_state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(STATE_DIR_NAME))
}

/// Get the state directory, honouring `TOKEN_DIR` when it is set and non-empty
pub fn state_dir() -> Option<PathBuf> {
    match std::env::var(TOKEN_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => Some(expand_home(&dir)),
        _ => default_state_dir(),
    }
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Create a directory (and parents) if it doesn't exist
///
/// Only a directory created here is restricted to the current user; an
/// existing one keeps its mode.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    restrict_permissions(dir, 0o700)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse file: {}", path.display()))
}

/// Save a value as pretty JSON, readable only by the current user
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    restrict_permissions(path, 0o600)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_default_state_dir() {
        let dir = default_state_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with(".support-agent"));
    }

    #[test]
    fn test_expand_home() {
        let expanded = expand_home("~/tokens");
        assert!(expanded.ends_with("tokens"));
        assert!(!expanded.to_string_lossy().starts_with('~'));

        assert_eq!(expand_home("/tmp/tokens"), PathBuf::from("/tmp/tokens"));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("sample.json");

        let sample = Sample {
            name: "token".to_string(),
            count: 2,
        };
        save_json_file(&path, &sample).unwrap();

        let loaded: Sample = load_json_file(&path).unwrap();
        assert_eq!(loaded, sample);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("secret.json");
        save_json_file(&path, &serde_json::json!({"k": "v"})).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_dir_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("state");
        save_json_file(&dir.join("token.json"), &serde_json::json!({})).unwrap();

        let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_dir_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("shared");
        std::fs::create_dir(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();

        save_json_file(&dir.join("token.json"), &serde_json::json!({"k": "v"})).unwrap();

        let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let result: Result<Sample> = load_json_file(&tmp.path().join("missing.json"));
        assert!(result.is_err());
    }
}
