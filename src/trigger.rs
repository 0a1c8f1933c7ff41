// src/trigger.rs

//! The script action: run an external program when an alias matches.
//!
//! A [`ScriptTrigger`] is in one of three states on each evaluation:
//! - inert: no script configured, nothing happens;
//! - throttled: the recurrence policy denies the fire, nothing happens;
//! - armed: the event context is serialized and the script is invoked.
//!
//! [`ScriptTrigger::perform_action`] never returns an error. Failures are
//! logged and handed back inside [`ActionOutcome`] for callers that care.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::context::{serialize_event, ContextError};
use crate::exec::{InvocationOutput, InvocationRequest, InvokeError, ProcessInvoker};
use crate::model::{Alias, Event};
use crate::recurrence::RecurrencePolicy;
use crate::types::RecurrenceMode;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("couldn't build event context for script [{}]: {source}", script.display())]
    Context {
        script: PathBuf,
        #[source]
        source: ContextError,
    },

    #[error("couldn't execute script [{}]: {source}", script.display())]
    Invoke {
        script: PathBuf,
        #[source]
        source: InvokeError,
    },
}

/// What a single `perform_action` call did.
#[derive(Debug)]
pub enum ActionOutcome {
    /// No script configured.
    Inert,
    /// The recurrence policy denied the fire.
    Throttled,
    /// The script ran and exited with code 0.
    Fired(InvocationOutput),
    /// Serialization or invocation failed.
    Failed(ActionError),
}

impl ActionOutcome {
    pub fn is_fired(&self) -> bool {
        matches!(self, ActionOutcome::Fired(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ActionOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            ActionOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct TriggerState {
    script: Option<PathBuf>,
    policy: RecurrencePolicy,
}

/// Script action attached to an alias.
///
/// Safe to share across tasks (`Arc<ScriptTrigger>`): the policy decision is
/// made under a per-trigger lock, the process itself runs without it.
pub struct ScriptTrigger {
    state: Mutex<TriggerState>,
    invoker: Arc<dyn ProcessInvoker>,
}

impl fmt::Debug for ScriptTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptTrigger")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ScriptTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// An empty path means "no script".
fn normalize_script(script: Option<PathBuf>) -> Option<PathBuf> {
    script.filter(|p| !p.as_os_str().is_empty())
}

impl ScriptTrigger {
    pub fn new(
        script: Option<PathBuf>,
        policy: RecurrencePolicy,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        Self {
            state: Mutex::new(TriggerState {
                script: normalize_script(script),
                policy,
            }),
            invoker,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TriggerState> {
        // Policy state stays consistent even if a holder panicked: every
        // mutation is a single assignment.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn script(&self) -> Option<PathBuf> {
        self.lock().script.clone()
    }

    pub fn set_script(&self, script: Option<PathBuf>) {
        self.lock().script = normalize_script(script);
    }

    /// Replace the recurrence policy. Firing history is not carried over.
    pub fn set_policy(&self, policy: RecurrencePolicy) {
        self.lock().policy = policy;
    }

    pub fn mode(&self) -> RecurrenceMode {
        self.lock().policy.mode()
    }

    pub fn period(&self) -> Option<Duration> {
        self.lock().policy.period()
    }

    pub fn last_fired_at(&self) -> Option<Instant> {
        self.lock().policy.last_fired_at()
    }

    pub fn is_dismissed(&self) -> bool {
        self.lock().policy.is_dismissed()
    }

    /// Dismiss an `until_dismissed` trigger. Returns `false` for other modes.
    pub fn dismiss(&self) -> bool {
        self.lock().policy.dismiss()
    }

    /// Re-arm a dismissed trigger. Returns `false` for other modes.
    pub fn rearm(&self) -> bool {
        self.lock().policy.rearm()
    }

    /// Human readable summary, e.g. `Run Script Every 30 Seconds Until Dismissed`.
    pub fn describe(&self) -> String {
        let state = self.lock();
        describe_state(state.script.as_deref(), &state.policy)
    }

    /// Evaluate this trigger for `event` now.
    pub async fn perform_action(&self, alias: &Alias, event: &Event) -> ActionOutcome {
        self.perform_action_at(alias, event, Instant::now()).await
    }

    /// Evaluate this trigger for `event` as of `now`.
    pub async fn perform_action_at(
        &self,
        alias: &Alias,
        event: &Event,
        now: Instant,
    ) -> ActionOutcome {
        if self.script().is_none() {
            debug!(alias = %alias, "no script configured; skipping");
            return ActionOutcome::Inert;
        }

        // Serialize before consulting the policy so a bad event never
        // consumes a fire.
        let event_json = match serialize_event(event) {
            Ok(json) => json,
            Err(source) => {
                let err = ActionError::Context {
                    script: self.script().unwrap_or_default(),
                    source,
                };
                error!(alias = %alias, error = %err, "dropping event for script action");
                return ActionOutcome::Failed(err);
            }
        };

        let script = {
            let mut state = self.lock();
            let Some(script) = state.script.clone() else {
                return ActionOutcome::Inert;
            };
            if !state.policy.should_fire(now) {
                debug!(
                    alias = %alias,
                    mode = %state.policy.mode(),
                    "script action throttled"
                );
                return ActionOutcome::Throttled;
            }
            script
        };

        let request = InvocationRequest::new(script.clone(), alias.name(), event_json);

        match self.invoker.invoke(request).await {
            Ok(output) => {
                info!(
                    alias = %alias,
                    script = %script.display(),
                    "script action completed"
                );
                ActionOutcome::Fired(output)
            }
            Err(source) => {
                let err = ActionError::Invoke { script, source };
                error!(alias = %alias, error = %err, "script action failed");
                ActionOutcome::Failed(err)
            }
        }
    }
}

fn describe_state(script: Option<&Path>, policy: &RecurrencePolicy) -> String {
    let mut s = String::from("Run Script");
    let period = policy.period().unwrap_or_default().as_secs();

    match policy.mode() {
        RecurrenceMode::Once => s.push_str(" Once"),
        RecurrenceMode::DelayedReset => {
            s.push_str(&format!(" Once, Reset After {period} Seconds"));
        }
        RecurrenceMode::UntilDismissed => {
            s.push_str(&format!(" Every {period} Seconds Until Dismissed"));
        }
    }

    if script.is_none() {
        s.push_str(" - (script file empty)");
    }

    s
}
