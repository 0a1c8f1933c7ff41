#![allow(dead_code)]

pub use scripthook_test_utils::{init_tracing, with_timeout};

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Shell scripts used by tests that spawn real processes.
///
/// All files are written before any test gets a path back, so no script is
/// ever exec'd while another thread still holds it open for writing.
pub struct Scripts {
    _dir: TempDir,
    pub ok: PathBuf,
    pub fail7: PathBuf,
    pub stderr_only: PathBuf,
    pub slow: PathBuf,
    pub not_executable: PathBuf,
    pub missing: PathBuf,
    /// Writes its pid to the file named by its first argument (the alias),
    /// then becomes `sleep 30` under that same pid.
    pub pid_sleeper: PathBuf,
}

static SCRIPTS: OnceLock<Scripts> = OnceLock::new();

pub fn scripts() -> &'static Scripts {
    SCRIPTS.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();

        let write = |name: &str, body: &str, mode: u32| {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
            path
        };

        let ok = write(
            "ok.sh",
            "#!/bin/sh\necho \"alias=$1\"\necho \"event=$2\"\nexit 0\n",
            0o755,
        );
        let fail7 = write(
            "fail7.sh",
            "#!/bin/sh\necho \"about to fail\"\necho \"bad thing\" >&2\nexit 7\n",
            0o755,
        );
        let stderr_only = write("stderr_only.sh", "#!/bin/sh\necho \"to stderr\" >&2\n", 0o755);
        let slow = write("slow.sh", "#!/bin/sh\necho started\nexec sleep 30\n", 0o755);
        let not_executable = write("plain.sh", "#!/bin/sh\nexit 0\n", 0o644);
        let missing = dir.path().join("does-not-exist.sh");
        let pid_sleeper = write(
            "pid_sleeper.sh",
            "#!/bin/sh\necho $$ > \"$1.tmp\"\nmv \"$1.tmp\" \"$1\"\nexec sleep 30\n",
            0o755,
        );

        Scripts {
            _dir: dir,
            ok,
            fail7,
            stderr_only,
            slow,
            not_executable,
            missing,
            pid_sleeper,
        }
    })
}

/// Wait for `pid_sleeper` to publish its pid at `path`.
pub async fn read_pid(path: &Path) -> u32 {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(text) = fs::read_to_string(path) {
            if let Ok(pid) = text.trim().parse() {
                return pid;
            }
        }
        assert!(Instant::now() < deadline, "no pid written to {}", path.display());
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// True once `pid` no longer runs: either fully reaped or a zombie.
pub fn process_gone(pid: u32) -> bool {
    match fs::read_to_string(format!("/proc/{pid}/stat")) {
        Err(_) => true,
        // Format: `pid (comm) state ...`; comm may contain spaces.
        Ok(stat) => stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.trim_start().chars().next())
            .is_some_and(|state| state == 'Z' || state == 'X'),
    }
}

/// Poll until `pid` is gone, failing the test after 5 seconds.
pub async fn assert_process_exits(pid: u32) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !process_gone(pid) {
        assert!(Instant::now() < deadline, "process {pid} is still running");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
