//! Application configuration
//!
//! Read from ~/.config/noot/config.json. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::manifest::default_manifest_path;

/// Default number of entries in the recent-workspaces menu
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    /// Override for the manifest file location
    pub manifest_path: Option<PathBuf>,
    /// `tracing` filter directive, overridden by RUST_LOG
    pub log_filter: String,
    /// Override for the log directory
    pub log_dir: Option<PathBuf>,
    pub recent_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            manifest_path: None,
            log_filter: "noot=info".to_string(),
            log_dir: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Get the path to the config file
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("noot")
        .join("config.json")
}

impl AppConfig {
    pub fn load_from(path: &Path) -> Result<Self, PersistenceError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Like `load_from`, but an unreadable or corrupt file falls back to
    /// defaults. The error is handed back for the caller to report.
    pub fn load_or_default(path: &Path) -> (Self, Option<PersistenceError>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(default_manifest_path)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("noot")
                .join("logs")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.recent_limit, DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "recent-limit": 3, "manifest-path": "/tmp/m.json" }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.manifest_path(), PathBuf::from("/tmp/m.json"));
        assert_eq!(config.log_filter, "noot=info");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"recent-limit\": ").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(PersistenceError::Serialization(_))
        ));
        let (config, warning) = AppConfig::load_or_default(&path);
        assert_eq!(config, AppConfig::default());
        assert!(matches!(warning, Some(PersistenceError::Serialization(_))));
    }
}
