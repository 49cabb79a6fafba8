//! CNCFlow Settings Crate
//!
//! Handles application configuration and where it lives on disk.

pub mod config;
pub mod error;

pub use config::{Config, EventBusSettings, LoggingSettings, RecordSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
