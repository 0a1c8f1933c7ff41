// src/exec/backend.rs

//! Pluggable process invoker abstraction.
//!
//! Script triggers talk to a `ProcessInvoker` instead of spawning processes
//! themselves. Production code uses [`super::TokioProcessInvoker`]; tests can
//! provide a spy that records invocations and returns canned results.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

/// A single script invocation: `<script> <alias> <event_json>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub script: PathBuf,
    pub alias: String,
    pub event_json: String,
}

impl InvocationRequest {
    pub fn new(
        script: impl Into<PathBuf>,
        alias: impl Into<String>,
        event_json: impl Into<String>,
    ) -> Self {
        Self {
            script: script.into(),
            alias: alias.into(),
            event_json: event_json.into(),
        }
    }

    /// Positional arguments after the program itself.
    pub fn args(&self) -> [&str; 2] {
        [self.alias.as_str(), self.event_json.as_str()]
    }
}

/// Result of a process that ran to completion with exit code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutput {
    pub exit_code: i32,
    /// Combined stdout/stderr, one `\n`-terminated line per line of output.
    pub output: String,
}

impl InvocationOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Why an invocation did not succeed.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("failed to start script {}: {source}", script.display())]
    Spawn {
        script: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Exit Code: {code} Console:{output}")]
    NonZeroExit { code: i32, output: String },

    #[error("script timed out after {timeout:?} Console:{output}")]
    TimedOut { timeout: Duration, output: String },

    #[error("IO error while running script: {0}")]
    Io(#[from] std::io::Error),
}

impl InvokeError {
    /// Output captured before the failure, if the process got that far.
    pub fn output(&self) -> Option<&str> {
        match self {
            InvokeError::NonZeroExit { output, .. } | InvokeError::TimedOut { output, .. } => {
                Some(output)
            }
            InvokeError::Spawn { .. } | InvokeError::Io(_) => None,
        }
    }

    /// Exit code of a process that ran and failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvokeError::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type InvokeResult = std::result::Result<InvocationOutput, InvokeError>;

/// Trait abstracting how scripts are executed.
///
/// The returned future resolves once the process has exited (or failed to
/// start). Dropping the future before then must not leak the process.
pub trait ProcessInvoker: Send + Sync {
    fn invoke(
        &self,
        request: InvocationRequest,
    ) -> Pin<Box<dyn Future<Output = InvokeResult> + Send + '_>>;
}
