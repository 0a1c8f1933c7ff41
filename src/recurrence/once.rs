// src/recurrence/once.rs

use std::time::Instant;

/// `ONCE`: the first evaluation fires, every later one is denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Once {
    fired_at: Option<Instant>,
}

impl Once {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_fire(&mut self, now: Instant) -> bool {
        if self.fired_at.is_some() {
            return false;
        }
        self.fired_at = Some(now);
        true
    }

    pub fn fired_at(&self) -> Option<Instant> {
        self.fired_at
    }
}
