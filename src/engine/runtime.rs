// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::trigger::ActionOutcome;

use super::{ActionDispatcher, RunSummary, RuntimeEvent};

/// What the loop should do after handling one event.
enum Flow {
    Continue,
    /// Stop accepting work, finish in-flight scripts, then exit.
    Drain,
    /// Kill in-flight scripts and exit.
    Abort,
}

/// Drives script actions in response to `RuntimeEvent`s.
///
/// Every matched action runs as its own Tokio task, so a slow script never
/// holds up intake of the next event. Script processes are spawned with
/// `kill_on_drop`, so aborting those tasks on shutdown also kills the
/// processes.
pub struct Runtime {
    dispatcher: Arc<ActionDispatcher>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    in_flight: JoinSet<ActionOutcome>,
    summary: RunSummary,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("in_flight", &self.in_flight.len())
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(dispatcher: Arc<ActionDispatcher>, event_rx: mpsc::Receiver<RuntimeEvent>) -> Self {
        Self {
            dispatcher,
            event_rx,
            in_flight: JoinSet::new(),
            summary: RunSummary::default(),
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Spawns one task per matched script action.
    /// - Collects finished actions into the returned [`RunSummary`].
    ///
    /// Exits after `FeedClosed` (or the channel closing) once in-flight
    /// actions finish, or immediately on `ShutdownRequested`.
    pub async fn run(mut self) -> RunSummary {
        info!("scripthook runtime started");

        let mut draining = false;
        let mut rx_open = true;

        loop {
            if draining && self.in_flight.is_empty() {
                break;
            }

            tokio::select! {
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.record(joined);
                }
                event = self.event_rx.recv(), if rx_open => match event {
                    Some(event) => {
                        debug!(?event, "runtime received event");
                        match self.handle_event(event) {
                            Flow::Continue => {}
                            Flow::Drain => draining = true,
                            Flow::Abort => {
                                self.abort_in_flight().await;
                                break;
                            }
                        }
                    }
                    None => {
                        info!("runtime event channel closed; draining");
                        rx_open = false;
                        draining = true;
                    }
                },
                else => break,
            }
        }

        info!(summary = ?self.summary, "runtime exiting");
        self.summary
    }

    fn handle_event(&mut self, event: RuntimeEvent) -> Flow {
        match event {
            RuntimeEvent::AliasMatched { alias, event } => {
                let Some(known) = self.dispatcher.alias(&alias).cloned() else {
                    debug!(alias = %alias, "event for unknown alias; ignoring");
                    return Flow::Continue;
                };

                for trigger in self.dispatcher.triggers_for(&alias).iter().cloned() {
                    let alias = known.clone();
                    let event = event.clone();
                    self.in_flight
                        .spawn(async move { trigger.perform_action(&alias, &event).await });
                }
                Flow::Continue
            }
            RuntimeEvent::Dismiss { alias } => {
                let count = self.dispatcher.dismiss(&alias);
                info!(alias = %alias, count, "dismiss requested");
                Flow::Continue
            }
            RuntimeEvent::Rearm { alias } => {
                let count = self.dispatcher.rearm(&alias);
                info!(alias = %alias, count, "re-arm requested");
                Flow::Continue
            }
            RuntimeEvent::FeedClosed => {
                info!(in_flight = self.in_flight.len(), "event feed closed; draining");
                Flow::Drain
            }
            RuntimeEvent::ShutdownRequested => {
                info!(in_flight = self.in_flight.len(), "shutdown requested");
                Flow::Abort
            }
        }
    }

    fn record(&mut self, joined: Result<ActionOutcome, JoinError>) {
        match joined {
            Ok(ActionOutcome::Fired(_)) => self.summary.fired += 1,
            Ok(ActionOutcome::Throttled) => self.summary.throttled += 1,
            Ok(ActionOutcome::Inert) => self.summary.inert += 1,
            Ok(ActionOutcome::Failed(_)) => self.summary.failed += 1,
            Err(e) if e.is_cancelled() => self.summary.cancelled += 1,
            Err(e) => {
                warn!(error = %e, "script action task panicked");
                self.summary.failed += 1;
            }
        }
    }

    async fn abort_in_flight(&mut self) {
        if self.in_flight.is_empty() {
            return;
        }
        info!(count = self.in_flight.len(), "aborting in-flight script actions");
        self.in_flight.abort_all();
        while let Some(joined) = self.in_flight.join_next().await {
            self.record(joined);
        }
    }
}
