// src/recurrence/throttle.rs

use std::time::{Duration, Instant};

/// Elapsed-time gate shared by the periodic modes.
///
/// Permits when nothing has fired yet or when at least `period` has passed
/// since the last permitted fire. A zero period always permits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throttle {
    period: Duration,
    last_fired_at: Option<Instant>,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_fired_at: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn last_fired_at(&self) -> Option<Instant> {
        self.last_fired_at
    }

    /// Check the gate at `now`, recording the fire if it opens.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let open = match self.last_fired_at {
            None => true,
            // A `now` earlier than the last fire saturates to zero elapsed.
            Some(last) => now.saturating_duration_since(last) >= self.period,
        };

        if open {
            self.last_fired_at = Some(now);
        }
        open
    }
}

/// `DELAYED_RESET`: fire, stay quiet for `period`, then re-arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedReset {
    throttle: Throttle,
}

impl DelayedReset {
    pub fn new(period: Duration) -> Self {
        Self {
            throttle: Throttle::new(period),
        }
    }

    pub fn should_fire(&mut self, now: Instant) -> bool {
        self.throttle.try_fire(now)
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }
}

/// `UNTIL_DISMISSED`: fire at most once per `period` until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntilDismissed {
    throttle: Throttle,
    dismissed: bool,
}

impl UntilDismissed {
    pub fn new(period: Duration) -> Self {
        Self {
            throttle: Throttle::new(period),
            dismissed: false,
        }
    }

    pub fn should_fire(&mut self, now: Instant) -> bool {
        if self.dismissed {
            return false;
        }
        self.throttle.try_fire(now)
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    /// Clear a dismissal. The elapsed-time gate keeps its history.
    pub fn rearm(&mut self) {
        self.dismissed = false;
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }
}
