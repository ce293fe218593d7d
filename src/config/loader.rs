// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a config file without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Read, deserialize and validate a config file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the raw config for a run.
///
/// An explicitly given path must exist. Without one, `Dagboard.toml` in the
/// working directory is used if present, otherwise built-in defaults.
pub fn load_raw_or_default(explicit: Option<&Path>) -> Result<RawConfigFile> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading configuration");
        return load_from_path(path);
    }

    let path = default_config_path();
    if path.is_file() {
        info!(path = %path.display(), "loading configuration");
        load_from_path(&path)
    } else {
        debug!(path = %path.display(), "no configuration file; using defaults");
        Ok(RawConfigFile::default())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Dagboard.toml")
}
