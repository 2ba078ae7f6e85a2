//! Configuration management for tpux
//!
//! Handles loading and saving the JSONC settings file. Nothing happens
//! implicitly: the CLI calls [`init`] once at startup, which creates the
//! config directory and a default settings file when they are missing.

pub mod paths;
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jsonc_parser::parse_to_serde_value;

pub use paths::{get_config_dir, get_config_path, get_pod_hosts_path};
pub use schema::Config;

/// Ensure the config directory exists
///
/// Creates `~/.config/tpux/` (or `$XDG_CONFIG_HOME/tpux/`) if needed and
/// returns its path.
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir =
        get_config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;
        tracing::info!("Created config directory: {}", config_dir.display());
    }

    Ok(config_dir)
}

/// Program-start initialisation
///
/// Creates the config directory, then loads the settings file (writing the
/// defaults first if it does not exist yet).
pub fn init() -> Result<Config> {
    ensure_config_dir()?;
    load_config()
}

/// Load configuration from the default settings file
pub fn load_config() -> Result<Config> {
    let config_path =
        get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    load_config_from(&config_path)
}

/// Load configuration from `path`, creating it with defaults when missing
///
/// Supports JSONC (JSON with comments) and rejects unknown fields.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found, creating default at: {}",
            path.display()
        );
        let config = Config::default();
        save_config_to(path, &config)?;
        return Ok(config);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let parsed_value = parse_to_serde_value(&contents, &Default::default())
        .map_err(|e| anyhow::anyhow!("Invalid JSONC in config file: {}", e))?
        .ok_or_else(|| anyhow::anyhow!("Config file is empty"))?;

    let config: Config = serde_json::from_value(parsed_value).with_context(|| {
        format!(
            "Invalid configuration in {}. Check for unknown fields or invalid values.",
            path.display()
        )
    })?;

    Ok(config)
}

/// Save configuration to the default settings file
pub fn save_config(config: &Config) -> Result<()> {
    ensure_config_dir()?;
    let config_path =
        get_config_path().ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    save_config_to(&config_path, config)
}

/// Save configuration to `path` as pretty-printed JSON
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    tracing::debug!("Saved config to: {}", path.display());
    Ok(())
}
