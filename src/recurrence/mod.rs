// src/recurrence/mod.rs

//! Recurrence policies: how often a script action may re-fire.
//!
//! Each mode is its own type with its own `should_fire`:
//! - [`Once`]: first evaluation only.
//! - [`DelayedReset`]: once, then quiet for `period`, then re-armed.
//! - [`UntilDismissed`]: once per `period` until [`RecurrencePolicy::dismiss`].
//!
//! Evaluation takes `now` explicitly so callers (and tests) own the clock.
//! Policies are plain values; the owning trigger provides the lock that makes
//! a read-decide-write atomic.

pub mod once;
pub mod throttle;

use std::time::{Duration, Instant};

pub use once::Once;
pub use throttle::{DelayedReset, Throttle, UntilDismissed};

use crate::types::RecurrenceMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrencePolicy {
    Once(Once),
    DelayedReset(DelayedReset),
    UntilDismissed(UntilDismissed),
}

impl Default for RecurrencePolicy {
    fn default() -> Self {
        RecurrencePolicy::once()
    }
}

impl RecurrencePolicy {
    pub fn once() -> Self {
        RecurrencePolicy::Once(Once::new())
    }

    pub fn delayed_reset(period: Duration) -> Self {
        RecurrencePolicy::DelayedReset(DelayedReset::new(period))
    }

    pub fn until_dismissed(period: Duration) -> Self {
        RecurrencePolicy::UntilDismissed(UntilDismissed::new(period))
    }

    /// Build a fresh policy for `mode`. `period` is ignored for `Once`.
    pub fn from_mode(mode: RecurrenceMode, period: Duration) -> Self {
        match mode {
            RecurrenceMode::Once => RecurrencePolicy::once(),
            RecurrenceMode::DelayedReset => RecurrencePolicy::delayed_reset(period),
            RecurrenceMode::UntilDismissed => RecurrencePolicy::until_dismissed(period),
        }
    }

    /// Decide whether a fire is permitted at `now`.
    ///
    /// Only a permitted result mutates state.
    pub fn should_fire(&mut self, now: Instant) -> bool {
        match self {
            RecurrencePolicy::Once(p) => p.should_fire(now),
            RecurrencePolicy::DelayedReset(p) => p.should_fire(now),
            RecurrencePolicy::UntilDismissed(p) => p.should_fire(now),
        }
    }

    /// Stop an `UntilDismissed` policy from firing until [`Self::rearm`].
    ///
    /// Returns `false` (and does nothing) for the other modes.
    pub fn dismiss(&mut self) -> bool {
        match self {
            RecurrencePolicy::UntilDismissed(p) => {
                p.dismiss();
                true
            }
            _ => false,
        }
    }

    /// Clear a dismissal. Returns `false` for modes that cannot be dismissed.
    pub fn rearm(&mut self) -> bool {
        match self {
            RecurrencePolicy::UntilDismissed(p) => {
                p.rearm();
                true
            }
            _ => false,
        }
    }

    pub fn is_dismissed(&self) -> bool {
        matches!(self, RecurrencePolicy::UntilDismissed(p) if p.is_dismissed())
    }

    pub fn mode(&self) -> RecurrenceMode {
        match self {
            RecurrencePolicy::Once(_) => RecurrenceMode::Once,
            RecurrencePolicy::DelayedReset(_) => RecurrenceMode::DelayedReset,
            RecurrencePolicy::UntilDismissed(_) => RecurrenceMode::UntilDismissed,
        }
    }

    /// Configured period; `None` for `Once`.
    pub fn period(&self) -> Option<Duration> {
        match self {
            RecurrencePolicy::Once(_) => None,
            RecurrencePolicy::DelayedReset(p) => Some(p.throttle().period()),
            RecurrencePolicy::UntilDismissed(p) => Some(p.throttle().period()),
        }
    }

    /// Instant of the most recent permitted fire.
    pub fn last_fired_at(&self) -> Option<Instant> {
        match self {
            RecurrencePolicy::Once(p) => p.fired_at(),
            RecurrencePolicy::DelayedReset(p) => p.throttle().last_fired_at(),
            RecurrencePolicy::UntilDismissed(p) => p.throttle().last_fired_at(),
        }
    }
}
