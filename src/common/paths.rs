//! Configuration and log file locations

use std::path::{Path, PathBuf};

use crate::common::Result;

/// Application name used for platform directories
const APP_NAME: &str = "petstore-scenario";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/petstore-scenario/`
/// - macOS: `~/Library/Application Support/petstore-scenario/`
/// - Windows: `%APPDATA%\petstore-scenario\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}

/// Create `dir` and any missing parents
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Ensure the log directory exists and return it
pub fn ensure_log_dir() -> Result<Option<PathBuf>> {
    match log_dir() {
        Some(dir) => {
            ensure_dir(&dir)?;
            Ok(Some(dir))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    #[test]
    fn test_config_path_ends_with_toml() {
        if let Some(path) = config_path() {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.toml"));
        }
    }

    #[test]
    fn test_log_dir_is_under_app_dir() {
        if let Some(dir) = log_dir() {
            assert!(dir.to_string_lossy().contains(APP_NAME));
        }
    }

    #[test]
    fn test_ensure_dir_creates_parents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("logs").join("nested");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());

        // Already present
        ensure_dir(&dir).unwrap();
    }

    #[test]
    fn test_ensure_dir_under_file_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let err = ensure_dir(&file.join("logs")).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got {:?}", err);
        assert!(err.to_string().starts_with("IO error:"));
    }
}
