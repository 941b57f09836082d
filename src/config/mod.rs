//! Configuration management for SideJira.
//!
//! Settings live in a small TOML file in the platform config directory.
//! Credentials never appear here; they belong to the secret store.

mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use settings::Settings;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// The settings file could not be read.
    #[error("could not read settings: {0}")]
    Read(#[from] std::io::Error),

    /// The settings file is not valid TOML.
    #[error("could not parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The SideJira config directory.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join("sidejira"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Path of the settings file.
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Path of the key/value state file (last-validated timestamp).
pub fn state_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("state.toml"))
}
