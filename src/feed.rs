// src/feed.rs

//! Newline-delimited JSON event feed.
//!
//! Stands in for the upstream decoder + alias matcher. Each non-blank line is
//! one record, tagged by `type` (defaults to `"event"`):
//!
//! ```text
//! {"type":"event","alias":"Fire Dispatch","timeStamp":1700000000000,"timeslot":0,"protocol":"MPT1327","identifiers":["RADIO-1001"]}
//! {"type":"dismiss","alias":"Fire Dispatch"}
//! {"type":"rearm","alias":"Fire Dispatch"}
//! ```

use std::io::{self, BufRead, Read};
use std::thread;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::engine::{AliasName, RuntimeEvent};
use crate::errors::Result;
use crate::model::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RecordKind {
    #[default]
    Event,
    Dismiss,
    Rearm,
}

#[derive(Debug, Deserialize)]
struct RecordHeader {
    #[serde(rename = "type", default)]
    kind: RecordKind,
    alias: AliasName,
}

/// A single parsed feed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRecord {
    Event { alias: AliasName, event: Event },
    Dismiss { alias: AliasName },
    Rearm { alias: AliasName },
}

impl From<FeedRecord> for RuntimeEvent {
    fn from(record: FeedRecord) -> Self {
        match record {
            FeedRecord::Event { alias, event } => RuntimeEvent::AliasMatched { alias, event },
            FeedRecord::Dismiss { alias } => RuntimeEvent::Dismiss { alias },
            FeedRecord::Rearm { alias } => RuntimeEvent::Rearm { alias },
        }
    }
}

/// Parse one feed line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<FeedRecord>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(line)?;
    let header = RecordHeader::deserialize(&value)?;

    let record = match header.kind {
        RecordKind::Event => FeedRecord::Event {
            alias: header.alias,
            event: Event::deserialize(&value)?,
        },
        RecordKind::Dismiss => FeedRecord::Dismiss {
            alias: header.alias,
        },
        RecordKind::Rearm => FeedRecord::Rearm {
            alias: header.alias,
        },
    };

    Ok(Some(record))
}

/// Line bookkeeping shared by the async and blocking readers.
#[derive(Debug, Default)]
struct LineCounter {
    lines: u64,
}

impl LineCounter {
    /// Parse one raw line; malformed lines are logged and yield `None`.
    fn accept(&mut self, line: &str) -> Option<RuntimeEvent> {
        self.lines += 1;
        match parse_line(line) {
            Ok(record) => record.map(Into::into),
            Err(e) => {
                warn!(line = self.lines, error = %e, "skipping malformed feed line");
                None
            }
        }
    }
}

/// Read records from `reader` and forward them to the runtime.
///
/// Malformed lines are logged and skipped. When the reader hits EOF (or
/// fails), `FeedClosed` is sent so the runtime can drain and exit.
pub fn spawn_feed_reader<R>(reader: R, runtime_tx: mpsc::Sender<RuntimeEvent>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        info!("event feed reader started");
        let mut lines = BufReader::new(reader).lines();
        let mut counter = LineCounter::default();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(event) = counter.accept(&line) else {
                        continue;
                    };
                    if runtime_tx.send(event).await.is_err() {
                        debug!("runtime gone; stopping feed reader");
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "reading event feed failed");
                    break;
                }
            }
        }

        info!(lines = counter.lines, "event feed closed");
        let _ = runtime_tx.send(RuntimeEvent::FeedClosed).await;
    })
}

/// Same as [`spawn_feed_reader`], but reads on a dedicated OS thread.
///
/// Used for stdin: a read parked on Tokio's blocking pool would keep the
/// runtime from shutting down while the writer holds the pipe open. This
/// thread is never joined, so process exit is not delayed by it.
pub fn spawn_blocking_feed_reader<R>(
    reader: R,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> io::Result<thread::JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("scripthook-feed".to_string())
        .spawn(move || {
            info!("event feed reader started");
            let mut counter = LineCounter::default();

            for line in io::BufReader::new(reader).lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!(error = %e, "reading event feed failed");
                        break;
                    }
                };
                let Some(event) = counter.accept(&line) else {
                    continue;
                };
                if runtime_tx.blocking_send(event).is_err() {
                    debug!("runtime gone; stopping feed reader");
                    return;
                }
            }

            info!(lines = counter.lines, "event feed closed");
            let _ = runtime_tx.blocking_send(RuntimeEvent::FeedClosed);
        })
}
