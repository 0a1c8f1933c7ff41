// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Per-concern errors live next to the code that produces them
//! ([`crate::context::ContextError`], [`crate::exec::InvokeError`],
//! [`crate::trigger::ActionError`]); this enum covers configuration loading
//! and the runtime shell.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptHookError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ScriptHookError>;
