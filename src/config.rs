use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::util::{app_home, expand_tilde};

const CONFIG_VERSION: u32 = 1;

fn default_submit_delay_ms() -> u64 {
    1500
}

fn default_donation_delay_ms() -> u64 {
    1500
}

fn default_log_retention() -> usize {
    10
}

/// Shell settings persisted at `~/.bluehearts/config.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub version: u32,
    /// Overrides the default `~/.bluehearts/storage` data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<String>,
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    #[serde(default = "default_donation_delay_ms")]
    pub donation_delay_ms: u64,
    /// How many rotated activity logs to keep.
    #[serde(default = "default_log_retention")]
    pub log_retention: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage_dir: None,
            submit_delay_ms: default_submit_delay_ms(),
            donation_delay_ms: default_donation_delay_ms(),
            log_retention: default_log_retention(),
        }
    }
}

impl AppConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn donation_delay(&self) -> Duration {
        Duration::from_millis(self.donation_delay_ms)
    }

    /// Directory backing local storage.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Some(PathBuf::from(expand_tilde(dir))),
            None => app_home().map(|h| h.join("storage")),
        }
    }

    /// Activity logs live next to the storage directory.
    pub fn logs_dir(&self) -> Option<PathBuf> {
        self.storage_dir().map(|d| match d.parent() {
            Some(parent) => parent.join("logs"),
            None => d.join("logs"),
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    app_home().map(|h| h.join("config.json"))
}

/// Missing or unreadable config falls back to defaults.
pub fn load_config_from(path: &Path) -> AppConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return AppConfig::default(),
    };
    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            AppConfig::default()
        }
    }
}

pub fn load_config() -> AppConfig {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => AppConfig::default(),
    }
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Custom(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let path = config_path()
        .ok_or_else(|| AppError::Custom("Cannot find home directory".into()))?;
    save_config_to(&path, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.submit_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"version":1,"submitDelayMs":10}"#).unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.submit_delay_ms, 10);
        assert_eq!(config.donation_delay_ms, 1500);
        assert_eq!(config.log_retention, 10);
    }

    #[test]
    fn test_garbage_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{{{").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            storage_dir: Some(dir.path().join("data").to_string_lossy().to_string()),
            submit_delay_ms: 0,
            ..AppConfig::default()
        };
        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path), config);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"storageDir\""));
    }

    #[test]
    fn test_logs_dir_sits_beside_storage() {
        let config = AppConfig {
            storage_dir: Some("/srv/bluehearts/storage".into()),
            ..AppConfig::default()
        };
        if !cfg!(windows) {
            assert_eq!(config.logs_dir(), Some(PathBuf::from("/srv/bluehearts/logs")));
        }
    }
}
