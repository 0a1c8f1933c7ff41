use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scripthook::exec::{
    InvocationOutput, InvocationRequest, InvokeError, InvokeResult, ProcessInvoker,
};

/// Canned result a `FakeInvoker` hands back.
#[derive(Debug, Clone)]
pub enum FakeResult {
    Success(String),
    Exit(i32, String),
    SpawnFailure,
}

/// A fake invoker that:
/// - records every request it receives
/// - returns a canned result without spawning anything
/// - optionally sleeps first, to simulate a slow script.
#[derive(Clone)]
pub struct FakeInvoker {
    calls: Arc<Mutex<Vec<InvocationRequest>>>,
    result: FakeResult,
    delay: Option<Duration>,
}

impl FakeInvoker {
    pub fn new(result: FakeResult) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            result,
            delay: None,
        }
    }

    pub fn succeeding() -> Self {
        Self::new(FakeResult::Success(String::new()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to the recorded requests.
    pub fn calls(&self) -> Arc<Mutex<Vec<InvocationRequest>>> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn into_invoker(self) -> Arc<dyn ProcessInvoker> {
        Arc::new(self)
    }
}

impl ProcessInvoker for FakeInvoker {
    fn invoke(
        &self,
        request: InvocationRequest,
    ) -> Pin<Box<dyn Future<Output = InvokeResult> + Send + '_>> {
        Box::pin(async move {
            {
                let mut guard = self.calls.lock().unwrap();
                guard.push(request.clone());
            }

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match &self.result {
                FakeResult::Success(output) => Ok(InvocationOutput {
                    exit_code: 0,
                    output: output.clone(),
                }),
                FakeResult::Exit(code, output) => Err(InvokeError::NonZeroExit {
                    code: *code,
                    output: output.clone(),
                }),
                FakeResult::SpawnFailure => Err(InvokeError::Spawn {
                    script: request.script,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        })
    }
}
