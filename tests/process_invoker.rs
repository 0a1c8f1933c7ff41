// tests/process_invoker.rs

#![cfg(unix)]

mod common;
use crate::common::{assert_process_exits, init_tracing, read_pid, scripts, with_timeout};

use std::time::{Duration, Instant};

use scripthook::exec::{InvocationRequest, InvokeError, ProcessInvoker, TokioProcessInvoker};

const EVENT_JSON: &str =
    r#"{"timeStamp":1700000000000,"timeslot":0,"protocol":"MPT1327","identifiers":["RADIO-1001","TALKGROUP-200"]}"#;

#[tokio::test]
async fn exit_zero_is_success_and_receives_argument_contract() {
    init_tracing();
    let invoker = TokioProcessInvoker::new();
    let request = InvocationRequest::new(&scripts().ok, "Fire Dispatch", EVENT_JSON);

    let output = with_timeout(invoker.invoke(request)).await.unwrap();

    assert!(output.success());
    assert_eq!(output.exit_code, 0);
    assert_eq!(
        output.output,
        format!("alias=Fire Dispatch\nevent={EVENT_JSON}\n")
    );
}

#[tokio::test]
async fn exit_seven_is_failure_with_code_and_output() {
    init_tracing();
    let invoker = TokioProcessInvoker::new();
    let request = InvocationRequest::new(&scripts().fail7, "A", EVENT_JSON);

    let err = with_timeout(invoker.invoke(request)).await.unwrap_err();

    match &err {
        InvokeError::NonZeroExit { code, output } => {
            assert_eq!(*code, 7);
            assert!(output.contains("about to fail\n"), "output: {output:?}");
            assert!(output.contains("bad thing\n"), "output: {output:?}");
        }
        other => panic!("expected NonZeroExit, got {other:?}"),
    }

    let msg = err.to_string();
    assert!(msg.contains('7'), "message: {msg}");
    assert!(msg.contains("about to fail"), "message: {msg}");
    assert!(msg.contains("bad thing"), "message: {msg}");
}

#[tokio::test]
async fn stderr_is_merged_into_output() {
    init_tracing();
    let invoker = TokioProcessInvoker::new();
    let request = InvocationRequest::new(&scripts().stderr_only, "A", "{}");

    let output = with_timeout(invoker.invoke(request)).await.unwrap();
    assert_eq!(output.output, "to stderr\n");
}

#[tokio::test]
async fn missing_script_is_a_spawn_failure() {
    init_tracing();
    let invoker = TokioProcessInvoker::new();
    let request = InvocationRequest::new(&scripts().missing, "A", "{}");

    let err = with_timeout(invoker.invoke(request)).await.unwrap_err();
    match err {
        InvokeError::Spawn { script, source } => {
            assert_eq!(script, scripts().missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected Spawn, got {other:?}"),
    }
}

#[tokio::test]
async fn non_executable_script_is_a_spawn_failure() {
    init_tracing();
    let invoker = TokioProcessInvoker::new();
    let request = InvocationRequest::new(&scripts().not_executable, "A", "{}");

    let err = with_timeout(invoker.invoke(request)).await.unwrap_err();
    assert!(
        matches!(err, InvokeError::Spawn { .. }),
        "expected Spawn, got {err:?}"
    );
}

#[tokio::test]
async fn slow_script_is_killed_on_timeout() {
    init_tracing();
    let invoker = TokioProcessInvoker::with_timeout(Some(Duration::from_millis(300)));
    let request = InvocationRequest::new(&scripts().slow, "A", "{}");

    let started = Instant::now();
    let err = with_timeout(invoker.invoke(request)).await.unwrap_err();

    match err {
        InvokeError::TimedOut { timeout, output } => {
            assert_eq!(timeout, Duration::from_millis(300));
            assert_eq!(output, "started\n");
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn dropping_an_invocation_does_not_hang() {
    init_tracing();
    let invoker = TokioProcessInvoker::new();
    let request = InvocationRequest::new(&scripts().slow, "A", "{}");

    // Cancel by dropping the future after a short while.
    let res = tokio::time::timeout(Duration::from_millis(200), invoker.invoke(request)).await;
    assert!(res.is_err(), "slow script should not have finished");
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn timed_out_process_is_killed_and_reaped() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("timeout.pid");
    let invoker = TokioProcessInvoker::with_timeout(Some(Duration::from_millis(500)));
    let request = InvocationRequest::new(
        &scripts().pid_sleeper,
        pid_file.to_string_lossy(),
        "{}",
    );

    let err = with_timeout(invoker.invoke(request)).await.unwrap_err();
    assert!(matches!(err, InvokeError::TimedOut { .. }), "{err:?}");

    let pid = read_pid(&pid_file).await;
    assert_process_exits(pid).await;
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn dropped_invocation_kills_its_process() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("dropped.pid");
    let invoker = TokioProcessInvoker::new();
    let request = InvocationRequest::new(
        &scripts().pid_sleeper,
        pid_file.to_string_lossy(),
        "{}",
    );

    let mut invocation = invoker.invoke(request);
    let pid = tokio::select! {
        res = &mut invocation => panic!("sleeper finished early: {res:?}"),
        pid = read_pid(&pid_file) => pid,
    };
    drop(invocation);

    assert_process_exits(pid).await;
}
