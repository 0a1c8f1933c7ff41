// src/model.rs

//! Entities consumed from the upstream pipeline.
//!
//! The decoder produces [`Event`]s and the alias matcher decides which
//! [`Alias`] they belong to. This crate only reads them.

use std::fmt;

use serde::Deserialize;

/// A named alias that actions are attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias {
    name: String,
}

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Protocol tag of a decoded message, e.g. `"MPT1327"` or `"P25"`.
///
/// The set of protocols is defined by the decoder; this is just its
/// canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Protocol(String);

impl Protocol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded message that matched an alias.
///
/// Deserializes from the same shape the event context is written in, so a
/// feed line and a script argument look alike.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    /// Milliseconds.
    #[serde(rename = "timeStamp")]
    pub timestamp: i64,

    /// 0 when the protocol has no timeslots.
    #[serde(default)]
    pub timeslot: u32,

    /// `None` is an upstream contract violation; serializing such an event
    /// fails with [`crate::context::ContextError::MissingProtocol`].
    #[serde(default)]
    pub protocol: Option<Protocol>,

    /// Participants / targets, order preserved.
    #[serde(default)]
    pub identifiers: Vec<String>,
}

impl Event {
    pub fn new(timestamp: i64, protocol: Protocol) -> Self {
        Self {
            timestamp,
            timeslot: 0,
            protocol: Some(protocol),
            identifiers: Vec::new(),
        }
    }

    pub fn with_timeslot(mut self, timeslot: u32) -> Self {
        self.timeslot = timeslot;
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifiers.push(identifier.into());
        self
    }
}
