// src/engine/mod.rs

//! Orchestration engine for scripthook.
//!
//! This module ties together:
//! - the alias → script action registry ([`dispatcher`])
//! - the main runtime event loop ([`runtime`]) that reacts to:
//!   - alias matches coming from the event feed
//!   - dismiss / re-arm requests
//!   - end of feed and shutdown signals

use crate::model::Event;

/// Canonical alias name type used throughout the engine.
pub type AliasName = String;

/// Events flowing into the runtime from the feed, signals, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The alias matcher decided `event` belongs to `alias`.
    AliasMatched { alias: AliasName, event: Event },
    /// Dismiss `until_dismissed` actions of an alias.
    Dismiss { alias: AliasName },
    /// Re-arm dismissed actions of an alias.
    Rearm { alias: AliasName },
    /// No more events will arrive; finish in-flight scripts and exit.
    FeedClosed,
    /// Stop now (e.g. Ctrl-C); in-flight scripts are killed.
    ShutdownRequested,
}

/// Counts of action outcomes over a runtime's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fired: usize,
    pub throttled: usize,
    pub inert: usize,
    pub failed: usize,
    /// Invocations aborted by shutdown.
    pub cancelled: usize,
}

pub mod dispatcher;
pub mod runtime;

pub use dispatcher::ActionDispatcher;
pub use runtime::Runtime;
