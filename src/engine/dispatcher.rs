// src/engine/dispatcher.rs

//! Alias → script action registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigFile;
use crate::exec::ProcessInvoker;
use crate::model::{Alias, Event};
use crate::trigger::{ActionOutcome, ScriptTrigger};

#[derive(Debug)]
struct AliasEntry {
    alias: Alias,
    triggers: Vec<Arc<ScriptTrigger>>,
}

/// Owns every configured alias and the script triggers attached to it.
///
/// Lookups are by alias name, as handed over by the alias matcher. Unknown
/// names are not an error: they simply have no actions.
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    aliases: BTreeMap<String, AliasEntry>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one trigger per configured action, all sharing `invoker`.
    pub fn from_config(cfg: &ConfigFile, invoker: Arc<dyn ProcessInvoker>) -> Self {
        let mut dispatcher = Self::new();

        for (name, alias_cfg) in cfg.alias.iter() {
            let alias = Alias::new(name.clone());
            // Aliases without actions are still known.
            dispatcher.ensure_alias(&alias);

            for action in alias_cfg.action.iter() {
                let trigger =
                    ScriptTrigger::new(action.script_path(), action.policy(), Arc::clone(&invoker));
                dispatcher.register(&alias, trigger);
            }
        }

        dispatcher
    }

    fn ensure_alias(&mut self, alias: &Alias) -> &mut AliasEntry {
        self.aliases
            .entry(alias.name().to_string())
            .or_insert_with(|| AliasEntry {
                alias: alias.clone(),
                triggers: Vec::new(),
            })
    }

    /// Attach `trigger` to `alias`, creating the alias if needed.
    pub fn register(&mut self, alias: &Alias, trigger: ScriptTrigger) -> Arc<ScriptTrigger> {
        let trigger = Arc::new(trigger);
        self.ensure_alias(alias).triggers.push(Arc::clone(&trigger));
        trigger
    }

    pub fn alias(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name).map(|entry| &entry.alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.values().map(|entry| &entry.alias)
    }

    /// Triggers attached to `name`; empty for unknown aliases.
    pub fn triggers_for(&self, name: &str) -> &[Arc<ScriptTrigger>] {
        self.aliases
            .get(name)
            .map(|entry| entry.triggers.as_slice())
            .unwrap_or_default()
    }

    /// Dismiss every dismissable trigger of `name`. Returns how many changed.
    pub fn dismiss(&self, name: &str) -> usize {
        let count = self
            .triggers_for(name)
            .iter()
            .filter(|t| t.dismiss())
            .count();
        debug!(alias = %name, count, "dismissed script actions");
        count
    }

    /// Re-arm every dismissable trigger of `name`. Returns how many changed.
    pub fn rearm(&self, name: &str) -> usize {
        let count = self
            .triggers_for(name)
            .iter()
            .filter(|t| t.rearm())
            .count();
        debug!(alias = %name, count, "re-armed script actions");
        count
    }

    /// Run every action of `name` for `event`, one after another.
    pub async fn perform_actions(&self, name: &str, event: &Event) -> Vec<ActionOutcome> {
        let Some(entry) = self.aliases.get(name) else {
            debug!(alias = %name, "event for unknown alias; ignoring");
            return Vec::new();
        };

        let mut outcomes = Vec::with_capacity(entry.triggers.len());
        for trigger in entry.triggers.iter() {
            outcomes.push(trigger.perform_action(&entry.alias, event).await);
        }
        outcomes
    }

    /// `(alias name, describe() of each action)` for display.
    pub fn describe_all(&self) -> Vec<(String, Vec<String>)> {
        self.aliases
            .iter()
            .map(|(name, entry)| {
                let lines = entry.triggers.iter().map(|t| t.describe()).collect();
                (name.clone(), lines)
            })
            .collect()
    }
}
