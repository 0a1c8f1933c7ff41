//! Shared helpers for scripthook tests: tracing setup, a recording
//! [`fake_invoker::FakeInvoker`] and config/event builders.

pub mod builders;
pub mod fake_invoker;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per process.
///
/// Script output lines are logged at `debug`, so
/// `RUST_LOG=scripthook=debug cargo test -- --nocapture` shows them.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if it takes longer than 5 seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
