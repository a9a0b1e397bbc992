// src/config/loader.rs

use std::fs;
use std::io;
use std::path::Path;

use crate::config::model::{RawConfigFile, RunConfig};
use crate::errors::{HandoffError, Result};

/// On-disk format of a config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs deserialization; it does **not** check watch items
/// or actions. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            HandoffError::ConfigError(format!("config file '{}' not found", path.display()))
        }
        _ => HandoffError::IoError(e),
    })?;

    let config: RawConfigFile = match ConfigFormat::from_path(path) {
        ConfigFormat::Json => serde_json::from_str(&contents)?,
        ConfigFormat::Toml => toml::from_str(&contents)?,
    };

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the entry point for the rest of the application. Any error
/// returned here happens before the initial program is launched, so no
/// cleanup is needed on failure.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RunConfig> {
    let raw_config = load_from_path(&path)?;
    let config = RunConfig::try_from(raw_config)?;
    Ok(config)
}
