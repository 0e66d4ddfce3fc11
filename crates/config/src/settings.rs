//! Configuration structures for markvault settings.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General application settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Popup window settings
    #[serde(default)]
    pub popup: PopupSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Selected theme name
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Directory holding the vault state file (optional override)
    #[serde(default)]
    pub vault_dir: Option<String>,
}

/// Popup window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopupSettings {
    /// Popup box width in characters
    #[serde(default = "default_popup_width")]
    pub width: u16,

    /// Popup box height in rows
    #[serde(default = "default_popup_height")]
    pub height: u16,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

// Default value functions for serde
fn default_theme_name() -> String {
    defaults::THEME_NAME.to_string()
}

fn default_popup_width() -> u16 {
    defaults::POPUP_WIDTH
}

fn default_popup_height() -> u16 {
    defaults::POPUP_HEIGHT
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

// Default implementations
impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            vault_dir: None,
        }
    }
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            width: default_popup_width(),
            height: default_popup_height(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.theme, "midnight");
        assert_eq!(config.general.vault_dir, None);
        assert_eq!(config.popup.width, 64);
        assert_eq!(config.logging.min_level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [general]
            theme = "paper"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.theme, "paper");
        assert_eq!(config.popup.height, 18);
        assert_eq!(config.logging.min_level, "info");
    }

    #[test]
    fn test_roundtrip_preserves_overrides() {
        let mut config = Config::default();
        config.general.vault_dir = Some("/tmp/vault".to_string());
        config.logging.min_level = "debug".to_string();

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.general.vault_dir.as_deref(), Some("/tmp/vault"));
        assert_eq!(parsed.logging.min_level, "debug");
    }
}
