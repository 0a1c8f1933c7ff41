// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, ScriptHookError};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::ScriptHookError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.alias))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_alias_names(cfg)?;
    validate_actions(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if let Some(ref timeout) = cfg.config.timeout {
        parse_duration(timeout).map_err(|e| {
            ScriptHookError::ConfigError(format!("[config].timeout is invalid: {e}"))
        })?;
    }
    Ok(())
}

fn validate_alias_names(cfg: &RawConfigFile) -> Result<()> {
    if cfg.alias.keys().any(|name| name.trim().is_empty()) {
        return Err(ScriptHookError::ConfigError(
            "alias names must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn validate_actions(cfg: &RawConfigFile) -> Result<()> {
    for (name, alias) in cfg.alias.iter() {
        for (idx, action) in alias.action.iter().enumerate() {
            // interval is strongly typed and validated during
            // deserialization; only the period depends on it.
            if action.interval.requires_period() && action.period.is_none() {
                return Err(ScriptHookError::ConfigError(format!(
                    "alias '{}' action #{} uses interval '{}' but has no `period`",
                    name,
                    idx + 1,
                    action.interval
                )));
            }
        }
    }
    Ok(())
}
