//! XDG Base Directory support for markvault.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "markvault";

/// Get the configuration directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME/markvault` or `~/.config/markvault`.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine config directory")
}

/// Get the data directory following XDG conventions.
///
/// Returns `$XDG_DATA_HOME/markvault` or `~/.local/share/markvault`.
pub fn get_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine data directory")
}
