use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "PE_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".postedit";

/// Error type for config and local storage I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("invalid local storage: {0}")]
    StorageParseError(#[from] serde_json::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Pick the data directory: explicit flag, then `$PE_DATA_DIR`, then
/// `./.postedit`
pub fn resolve_data_dir(flag: Option<&str>) -> PathBuf {
    if let Some(dir) = flag {
        return PathBuf::from(dir);
    }
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_DATA_DIR),
    }
}

/// Read config.toml from the data directory. A missing file yields the
/// defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let config_text = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&config_text)?)
}
