//! TOML configuration file I/O
//!
//! Handles loading and saving the launcher configuration to/from TOML files
//! in the user's configuration directory.

use crate::config::TrackerConfig;
use crate::error::{ConfigError, EdgeError};
use std::path::{Path, PathBuf};

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the default configuration directory
///
/// Returns ~/.config/edgectl on Linux, or the EDGECTL_CONFIG_DIR
/// environment variable if set.
pub fn get_config_dir() -> Result<PathBuf, EdgeError> {
    // Allow tests to override config directory via environment variable
    if let Ok(config_dir) = std::env::var("EDGECTL_CONFIG_DIR") {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        EdgeError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    let config_dir = PathBuf::from(home).join(".config").join("edgectl");
    Ok(config_dir)
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, EdgeError> {
    let config_dir = get_config_dir()?;
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Load the launcher configuration from the default TOML file
///
/// A missing configuration file is not an error: defaults apply, matching
/// a zero-configuration project-local deployment.
pub fn load_config() -> Result<TrackerConfig, EdgeError> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        tracing::debug!(
            "No configuration file at {:?}, using defaults",
            config_path
        );
        return Ok(TrackerConfig::default());
    }

    load_config_from_path(&config_path)
}

/// Load the launcher configuration from a specific TOML file
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<TrackerConfig, EdgeError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EdgeError::Config(ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }),
        _ => EdgeError::Config(ConfigError::IoError {
            message: format!("Failed to read config file: {}", e),
        }),
    })?;

    let config: TrackerConfig = toml::from_str(&contents).map_err(|e| {
        EdgeError::Config(ConfigError::ValidationError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })?;

    // Validate the loaded configuration
    config
        .validate()
        .map_err(|e| EdgeError::Config(ConfigError::ValidationError { message: e }))?;

    Ok(config)
}

/// Save the launcher configuration to a specific TOML file
pub fn save_config_to_path<P: AsRef<Path>>(
    config: &TrackerConfig,
    path: P,
) -> Result<(), EdgeError> {
    // Validate configuration before saving
    config
        .validate()
        .map_err(|e| EdgeError::Config(ConfigError::ValidationError { message: e }))?;

    // Ensure config directory exists
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EdgeError::Config(ConfigError::IoError {
                    message: format!("Failed to create config directory: {}", e),
                })
            })?;
        }
    }

    let contents = toml::to_string_pretty(config)?;

    std::fs::write(&path, contents).map_err(|_e| {
        EdgeError::Config(ConfigError::SaveFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        })
    })?;

    Ok(())
}

/// Check if a configuration file exists
pub fn config_exists() -> Result<bool, EdgeError> {
    let config_path = get_config_path()?;
    Ok(config_path.exists())
}
