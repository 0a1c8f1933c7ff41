// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a config file without semantic checks.
///
/// Unknown `interval` names already fail here as TOML errors.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(toml::from_str(&contents)?)
}

/// Read, deserialize and validate a config file.
///
/// See [`ConfigFile`]'s `TryFrom<RawConfigFile>` impl for the rules.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}

/// `Scripthook.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Scripthook.toml")
}
