// src/exec/process_runner.rs

//! Script process runner backed by `tokio::process`.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::backend::{
    InvocationOutput, InvocationRequest, InvokeError, InvokeResult, ProcessInvoker,
};

/// Production invoker: one OS process per invocation, optional timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessInvoker {
    timeout: Option<Duration>,
}

impl TokioProcessInvoker {
    /// Invoker that waits for scripts as long as they take.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoker that kills scripts running longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ProcessInvoker for TokioProcessInvoker {
    fn invoke(
        &self,
        request: InvocationRequest,
    ) -> Pin<Box<dyn Future<Output = InvokeResult> + Send + '_>> {
        let timeout = self.timeout;
        Box::pin(run_script(request, timeout))
    }
}

/// Run `<script> <alias> <event_json>` to completion and classify the result.
///
/// - stderr is merged into the captured output, line by line, in the order
///   lines arrive.
/// - On timeout the process is killed and reaped, and whatever output was
///   captured so far is returned in [`InvokeError::TimedOut`].
/// - The child is spawned with `kill_on_drop(true)`: dropping this future
///   mid-flight kills the process.
pub async fn run_script(request: InvocationRequest, timeout: Option<Duration>) -> InvokeResult {
    info!(
        script = %request.script.display(),
        alias = %request.alias,
        "starting script process"
    );

    let mut cmd = Command::new(&request.script);
    cmd.args(request.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| InvokeError::Spawn {
        script: request.script.clone(),
        source,
    })?;

    let mut output = String::new();

    let waited = match timeout {
        Some(limit) => {
            match tokio::time::timeout(limit, collect_and_wait(&mut child, &mut output, &request))
                .await
            {
                Ok(waited) => waited,
                Err(_elapsed) => {
                    warn!(
                        script = %request.script.display(),
                        alias = %request.alias,
                        timeout = ?limit,
                        "script exceeded timeout; killing process"
                    );
                    if let Err(e) = child.kill().await {
                        warn!(
                            script = %request.script.display(),
                            error = %e,
                            "failed to kill timed out script process"
                        );
                    }
                    return Err(InvokeError::TimedOut {
                        timeout: limit,
                        output,
                    });
                }
            }
        }
        None => collect_and_wait(&mut child, &mut output, &request).await,
    };

    let status = waited?;

    // Killed by a signal: no exit code.
    let code = status.code().unwrap_or(-1);

    info!(
        script = %request.script.display(),
        alias = %request.alias,
        exit_code = code,
        success = status.success(),
        "script process exited"
    );

    if status.success() {
        Ok(InvocationOutput {
            exit_code: code,
            output,
        })
    } else {
        Err(InvokeError::NonZeroExit { code, output })
    }
}

/// Drain stdout and stderr into `output` until both close, then reap.
async fn collect_and_wait(
    child: &mut Child,
    output: &mut String,
    request: &InvocationRequest,
) -> io::Result<ExitStatus> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("script stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("script stderr was not captured"))?;

    let mut stdout_lines = BufReader::new(stdout).split(b'\n');
    let mut stderr_lines = BufReader::new(stderr).split(b'\n');
    let mut stdout_open = true;
    let mut stderr_open = true;

    while stdout_open || stderr_open {
        tokio::select! {
            line = stdout_lines.next_segment(), if stdout_open => match line? {
                Some(line) => push_line(output, &line, request, "stdout"),
                None => stdout_open = false,
            },
            line = stderr_lines.next_segment(), if stderr_open => match line? {
                Some(line) => push_line(output, &line, request, "stderr"),
                None => stderr_open = false,
            },
        }
    }

    child.wait().await
}

fn push_line(output: &mut String, raw: &[u8], request: &InvocationRequest, stream: &str) {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);

    debug!(alias = %request.alias, stream, "script: {}", line);

    output.push_str(&line);
    output.push('\n');
}
