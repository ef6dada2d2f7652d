//! Configuration loading functionality.
//!
//! Handles locating `nightfall.toml`, parsing it and applying defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::validation::validate_config;
use super::{Config, table_entries};
use crate::common::constants::*;
use crate::common::utils::private_path;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
/// Returns an error if already set.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
/// Returns None if using the default directory.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Get the configuration file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        if !custom_dir.is_dir() {
            anyhow::bail!(
                "Configuration directory not found: {}",
                private_path(&custom_dir)
            );
        }
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration using automatic path detection.
///
/// A missing file yields the built-in defaults; nothing is written to disk.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        log_debug!(
            "No configuration at {}, using built-in defaults",
            private_path(&config_path)
        );
        return Ok(Config::defaults());
    }

    load_from_path(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            private_path(&config_path)
        )
    })
}

/// Load configuration from a specific path.
///
/// Unlike [`load`], a missing file is an error here.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)?;
    apply_defaults(&mut config);

    Ok(config)
}

/// Apply default values to configuration fields.
pub(crate) fn apply_defaults(config: &mut Config) {
    if config.weekday.is_none() {
        config.weekday = Some(table_entries(DEFAULT_WEEKDAY_SCHEDULE));
    }
    if config.weekend.is_none() {
        config.weekend = Some(table_entries(DEFAULT_WEEKEND_SCHEDULE));
    }
    if config.weekend_days.is_none() {
        config.weekend_days = Some(DEFAULT_WEEKEND_DAYS.iter().map(|d| d.to_string()).collect());
    }

    if config.channel.is_none() {
        config.channel = Some(DEFAULT_CHANNEL);
    }
    if config.index.is_none() {
        config.index = Some(DEFAULT_INDEX);
    }

    if config.fade_duration_ms.is_none() {
        config.fade_duration_ms = Some(DEFAULT_FADE_DURATION_MS);
    }
    if config.tick_ms.is_none() {
        config.tick_ms = Some(DEFAULT_TICK_MS);
    }
    if config.hold_ms.is_none() {
        config.hold_ms = Some(DEFAULT_HOLD_MS);
    }
    if config.palette.is_none() {
        config.palette = Some(DEFAULT_FESTIVE_PALETTE.to_vec());
    }
}
