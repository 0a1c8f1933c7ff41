// tests/binary.rs

#![cfg(unix)]

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

fn exe() -> &'static str {
    env!("CARGO_BIN_EXE_scripthook")
}

#[test]
fn sigint_exits_while_stdin_is_still_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("Scripthook.toml");
    std::fs::write(&config, "[alias.A]\n").unwrap();

    // Stdin stays piped and is never closed by the test.
    let mut child = Command::new(exe())
        .arg("--config")
        .arg(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let _stdin = child.stdin.take();

    // Let the Ctrl-C listener install before signalling.
    std::thread::sleep(Duration::from_millis(500));
    let status = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            assert!(status.success(), "scripthook exited with {status}");
            return;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("scripthook still running 5s after SIGINT");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn end_of_stdin_drains_and_exits() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("Scripthook.toml");
    std::fs::write(&config, "[alias.A]\n[[alias.A.action]]\n").unwrap();

    let output = Command::new(exe())
        .arg("--config")
        .arg(&config)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .unwrap();

    assert!(output.status.success());
}

#[test]
fn dry_run_lists_every_alias_and_action() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("Scripthook.toml");
    std::fs::write(
        &config,
        r#"
[alias.Dispatch]
[[alias.Dispatch.action]]
script = "/opt/alert.sh"
interval = "delayed_reset"
period = 60

[[alias.Dispatch.action]]

[alias.Silent]
"#,
    )
    .unwrap();

    let output = Command::new(exe())
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("aliases (2):"), "{stdout}");
    assert!(stdout.contains("  - Dispatch\n"), "{stdout}");
    assert!(stdout.contains("Run Script Once, Reset After 60 Seconds\n"), "{stdout}");
    assert!(stdout.contains("script: /opt/alert.sh"), "{stdout}");
    assert!(stdout.contains("Run Script Once - (script file empty)"), "{stdout}");
    assert!(stdout.contains("  - Silent\n      (no actions)"), "{stdout}");
}
