//! Configuration and settings management for CNCFlow
//!
//! Supports JSON and TOML files; the extension picks the format. The default
//! location is `cncflow/config.toml` under the platform config directory.
//!
//! Configuration is organized into sections:
//! - Event bus tuning (channel capacity, history)
//! - Logging (default filter level)
//! - Record storage (machine records file)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use cncflow_core::EventBusConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "cncflow";
const CONFIG_FILE: &str = "config.toml";
const RECORDS_FILE: &str = "records.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// Event bus tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusSettings {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
    /// Keep a history of published events
    pub enable_history: bool,
    /// Maximum number of events kept in history
    pub max_history_size: usize,
    /// How long history entries are kept, in seconds
    pub history_retention_secs: u64,
}

impl Default for EventBusSettings {
    fn default() -> Self {
        let defaults = EventBusConfig::default();
        Self {
            channel_capacity: defaults.channel_capacity,
            enable_history: defaults.enable_history,
            max_history_size: defaults.max_history_size,
            history_retention_secs: defaults.history_retention.as_secs(),
        }
    }
}

impl From<&EventBusSettings> for EventBusConfig {
    fn from(settings: &EventBusSettings) -> Self {
        Self {
            channel_capacity: settings.channel_capacity,
            enable_history: settings.enable_history,
            max_history_size: settings.max_history_size,
            history_retention: Duration::from_secs(settings.history_retention_secs),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where machine records are stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    /// Records file; defaults to `records.json` in the config directory
    pub path: Option<PathBuf>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub event_bus: EventBusSettings,
    pub logging: LoggingSettings,
    pub records: RecordSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for the application
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| SettingsError::ConfigDirectory("no platform config directory".into()))
    }

    /// Default config file path
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_bus.channel_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "event_bus.channel_capacity".to_string(),
                value: "0".to_string(),
            });
        }

        if self.event_bus.max_history_size == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "event_bus.max_history_size".to_string(),
                value: "0".to_string(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingKey("logging.level".to_string()));
        }

        Ok(())
    }

    /// Event bus configuration built from these settings
    pub fn event_bus_config(&self) -> EventBusConfig {
        EventBusConfig::from(&self.event_bus)
    }

    /// Records file, falling back to the config directory
    pub fn records_path(&self) -> SettingsResult<PathBuf> {
        match &self.records.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(RECORDS_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.event_bus_config().channel_capacity, 1024);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.event_bus.channel_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_level() {
        let mut config = Config::default();
        config.logging.level = " ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingKey("logging.level".to_string()))
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.event_bus.enable_history = true;
        config.logging.level = "cncflow=debug".to_string();
        config.records.path = Some(dir.path().join("records.json"));
        config.save_to_file(&path).unwrap();

        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_json_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "logging": { "level": "warn" } }"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.event_bus, EventBusSettings::default());
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        assert!(matches!(
            Config::default().save_to_file(&path),
            Err(SettingsError::Config(ConfigError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_records_path() {
        let mut config = Config::default();
        config.records.path = Some(PathBuf::from("/tmp/machines.json"));
        assert_eq!(
            config.records_path().unwrap(),
            PathBuf::from("/tmp/machines.json")
        );
    }
}
