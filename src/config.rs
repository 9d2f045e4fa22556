//! Configuration for the vitals tracker.

use crate::directory::Directory;
use crate::record::Clock;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Name of the store file inside `data_path`.
pub const STORE_FILE: &str = "store.json";

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the record store
    pub data_path: PathBuf,

    /// User shown when no user is given
    pub default_user_id: String,

    /// IANA timezone for record timestamps (local time when unset)
    pub timezone: Option<String>,

    /// Doctor and hospital listings
    pub directory: Directory,

    /// Port for `vitals serve`
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitals-tracker");

        Self {
            data_path: data_dir,
            default_user_id: "user123".to_string(),
            timezone: None,
            directory: Directory::default(),
            server_port: 7878,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if absent.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitals-tracker")
            .join("config.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Path of the record store file.
    pub fn store_path(&self) -> PathBuf {
        self.data_path.join(STORE_FILE)
    }

    /// Clock for stamping new records. An unknown timezone is reported here
    /// rather than at load, so the rest of the configuration still applies.
    pub fn clock(&self) -> Result<Clock, ConfigError> {
        match &self.timezone {
            None => Ok(Clock::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(Clock::Zone)
                .map_err(|_| ConfigError::InvalidTimezone(name.clone())),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_user_id, "user123");
        assert!(config.timezone.is_none());
        assert_eq!(config.directory.doctors.len(), 3);
        assert!(config.store_path().ends_with(STORE_FILE));
        assert!(matches!(config.clock(), Ok(Clock::Local)));
    }

    #[test]
    fn test_timezone_clock() {
        let config = Config {
            timezone: Some("Europe/Berlin".to_string()),
            ..Config::default()
        };
        assert!(matches!(config.clock(), Ok(Clock::Zone(tz)) if tz == chrono_tz::Europe::Berlin));

        let config = Config {
            timezone: Some("Mars/Olympus".to_string()),
            ..Config::default()
        };
        assert!(matches!(config.clock(), Err(ConfigError::InvalidTimezone(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            default_user_id: "patient-7".to_string(),
            server_port: 9000,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_user_id, "patient-7");
        assert_eq!(loaded.server_port, 9000);
        assert_eq!(loaded.directory, config.directory);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_user_id": "someone"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_user_id, "someone");
        assert_eq!(loaded.server_port, 7878);
    }

    #[test]
    fn test_bad_timezone_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let data_path = dir.path().join("records");
        let content = serde_json::json!({
            "data_path": data_path,
            "default_user_id": "patient-7",
            "timezone": "Mars/Olympus",
        });
        std::fs::write(&path, content.to_string()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data_path, data_path);
        assert_eq!(loaded.store_path(), data_path.join(STORE_FILE));
        assert_eq!(loaded.default_user_id, "patient-7");
        assert!(matches!(loaded.clock(), Err(ConfigError::InvalidTimezone(name)) if name == "Mars/Olympus"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.default_user_id, "user123");
    }
}
