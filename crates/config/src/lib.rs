//! Configuration management for markvault.
//!
//! This crate provides configuration loading, saving, and validation
//! with support for TOML format and XDG directory conventions.

pub mod constants;
mod settings;
mod xdg;

pub use settings::{Config, GeneralSettings, LoggingSettings, PopupSettings};
pub use xdg::{get_config_dir, get_data_dir};

use anyhow::Result;
use std::path::PathBuf;

/// Default values as constants
pub mod defaults {
    pub const THEME_NAME: &str = "midnight";
    pub const POPUP_WIDTH: u16 = 64;
    pub const POPUP_HEIGHT: u16 = 18;
    pub const MIN_LOG_LEVEL: &str = "info";
}

impl Config {
    /// Load configuration from file.
    ///
    /// On first run, creates config file with default values.
    /// Auto-completes missing keys with default values.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if config_path.exists() {
            let original_content = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&original_content)?;

            // Serialize back to get normalized content
            let normalized_content = toml::to_string_pretty(&config)?;

            // If content changed, save the updated config
            if original_content != normalized_content {
                config.save()?;
            }

            Ok(config)
        } else {
            // First run - create config file with default values
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Directory holding the vault state file.
    ///
    /// Honors the `general.vault_dir` override, otherwise the XDG data
    /// directory.
    pub fn vault_dir(&self) -> Result<PathBuf> {
        match &self.general.vault_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => get_data_dir(),
        }
    }

    /// Path of the log file.
    ///
    /// Honors the `logging.file_path` override, otherwise
    /// `markvault.log` in the XDG data directory.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        match &self.logging.file_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(get_data_dir()?.join("markvault.log")),
        }
    }
}
