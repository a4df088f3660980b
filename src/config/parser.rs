//! Configuration file parsing (YAML format).

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::error::ConfigError;
use crate::config::types::RawConfig;

/// Config written on first run when no file exists yet.
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.yml");

/// Load configuration from a YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<RawConfig, ConfigError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    })?;

    load_config_str(&content)
}

/// Load configuration from a YAML string.
///
/// An empty document is an empty config, not an error.
pub fn load_config_str(content: &str) -> Result<RawConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(RawConfig::default());
    }

    serde_yaml::from_str::<Option<RawConfig>>(content)
        .map(Option::unwrap_or_default)
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}

/// Write the bundled default config to `path` unless a file is already there.
///
/// Returns `true` when a new file was written.
pub fn ensure_default_config(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }

    let io_error = |source| ConfigError::IoError {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, DEFAULT_CONFIG).map_err(io_error)?;

    info!("Wrote default configuration to {}", path.display());
    Ok(true)
}
