// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::recurrence::RecurrencePolicy;
use crate::types::{period_from_secs, RecurrenceMode};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// timeout = "30s"
///
/// [alias."Fire Dispatch"]
/// [[alias."Fire Dispatch".action]]
/// script = "/usr/local/bin/notify.sh"
/// interval = "delayed_reset"
/// period = 60
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All aliases from `[alias.<name>]`, keyed by alias name.
    #[serde(default)]
    pub alias: BTreeMap<String, AliasConfig>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub alias: BTreeMap<String, AliasConfig>,
}

impl ConfigFile {
    /// Only for use after validation has passed.
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        alias: BTreeMap<String, AliasConfig>,
    ) -> Self {
        Self { config, alias }
    }

    /// Parsed `[config].timeout`. Validation guarantees it parses.
    pub fn script_timeout(&self) -> Option<Duration> {
        self.config
            .timeout
            .as_deref()
            .and_then(|s| crate::types::parse_duration(s).ok())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigSection {
    /// Maximum script run time, e.g. `"30s"`. Absent means no limit.
    #[serde(default)]
    pub timeout: Option<String>,
}

/// `[alias.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AliasConfig {
    /// Script actions, from `[[alias.<name>.action]]`.
    #[serde(default)]
    pub action: Vec<ScriptActionConfig>,
}

/// One `[[alias.<name>.action]]` entry.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScriptActionConfig {
    /// Script to run. Absent or empty leaves the action inert.
    #[serde(default)]
    pub script: Option<String>,

    /// `"once"` (default), `"delayed_reset"` or `"until_dismissed"`.
    #[serde(default)]
    pub interval: RecurrenceMode,

    /// Seconds; required unless `interval = "once"`.
    #[serde(default)]
    pub period: Option<i64>,
}

impl ScriptActionConfig {
    /// Script path exactly as written; `None` when absent or all whitespace.
    pub fn script_path(&self) -> Option<PathBuf> {
        self.script
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Fresh recurrence policy for this action.
    pub fn policy(&self) -> RecurrencePolicy {
        let period = period_from_secs(self.period.unwrap_or(0));
        RecurrencePolicy::from_mode(self.interval, period)
    }
}
