// src/context.rs

//! Event context handed to scripts as their third argument.
//!
//! The JSON shape is a compatibility contract with existing scripts:
//!
//! ```json
//! {"timeStamp":1700000000000,"timeslot":0,"protocol":"MPT1327","identifiers":["RADIO-1001"]}
//! ```
//!
//! Exactly these four keys, nothing else.

use serde::Serialize;
use thiserror::Error;

use crate::model::Event;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("event has no protocol tag")]
    MissingProtocol,

    #[error("failed to encode event context: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Borrowed view of an [`Event`] with the wire key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventContext<'a> {
    #[serde(rename = "timeStamp")]
    pub timestamp: i64,
    pub timeslot: u32,
    pub protocol: &'a str,
    pub identifiers: &'a [String],
}

impl<'a> EventContext<'a> {
    pub fn from_event(event: &'a Event) -> Result<Self, ContextError> {
        let protocol = event
            .protocol
            .as_ref()
            .map(|p| p.name())
            .filter(|name| !name.trim().is_empty())
            .ok_or(ContextError::MissingProtocol)?;

        Ok(Self {
            timestamp: event.timestamp,
            timeslot: event.timeslot,
            protocol,
            identifiers: &event.identifiers,
        })
    }

    pub fn to_json(&self) -> Result<String, ContextError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serialize an event into its compact JSON context string.
pub fn serialize_event(event: &Event) -> Result<String, ContextError> {
    EventContext::from_event(event)?.to_json()
}
