#![allow(dead_code)]

use std::collections::BTreeMap;

use scripthook::config::{
    AliasConfig, ConfigFile, ConfigSection, RawConfigFile, ScriptActionConfig,
};
use scripthook::model::{Event, Protocol};
use scripthook::types::RecurrenceMode;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                alias: BTreeMap::new(),
            },
        }
    }

    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.config.timeout = Some(timeout.to_string());
        self
    }

    /// Add `action` to `alias`, creating the alias on first use.
    pub fn with_action(mut self, alias: &str, action: ScriptActionConfig) -> Self {
        self.config
            .alias
            .entry(alias.to_string())
            .or_insert_with(AliasConfig::default)
            .action
            .push(action);
        self
    }

    /// Add an alias with no actions.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.config.alias.entry(alias.to_string()).or_default();
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ScriptActionConfig`.
pub struct ActionConfigBuilder {
    action: ScriptActionConfig,
}

impl ActionConfigBuilder {
    pub fn new(script: &str) -> Self {
        Self {
            action: ScriptActionConfig {
                script: Some(script.to_string()),
                interval: RecurrenceMode::Once,
                period: None,
            },
        }
    }

    pub fn inert() -> Self {
        Self {
            action: ScriptActionConfig::default(),
        }
    }

    pub fn once(mut self) -> Self {
        self.action.interval = RecurrenceMode::Once;
        self
    }

    pub fn delayed_reset(mut self, period: i64) -> Self {
        self.action.interval = RecurrenceMode::DelayedReset;
        self.action.period = Some(period);
        self
    }

    pub fn until_dismissed(mut self, period: i64) -> Self {
        self.action.interval = RecurrenceMode::UntilDismissed;
        self.action.period = Some(period);
        self
    }

    pub fn build(self) -> ScriptActionConfig {
        self.action
    }
}

/// Builder for `Event`.
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    pub fn new(protocol: &str) -> Self {
        Self {
            event: Event::new(1_700_000_000_000, Protocol::new(protocol)),
        }
    }

    pub fn timestamp(mut self, millis: i64) -> Self {
        self.event.timestamp = millis;
        self
    }

    pub fn timeslot(mut self, slot: u32) -> Self {
        self.event.timeslot = slot;
        self
    }

    pub fn identifier(mut self, id: &str) -> Self {
        self.event.identifiers.push(id.to_string());
        self
    }

    pub fn without_protocol(mut self) -> Self {
        self.event.protocol = None;
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}
