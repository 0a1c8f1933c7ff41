// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running alias scripts, using
//! `tokio::process::Command`, and classifying how they ended.
//!
//! - [`backend`] provides the `ProcessInvoker` trait together with the
//!   request / output / error types that cross it.
//! - [`process_runner`] contains `TokioProcessInvoker`, the implementation
//!   used in production; tests can swap in a spy.

pub mod backend;
pub mod process_runner;

pub use backend::{
    InvocationOutput, InvocationRequest, InvokeError, InvokeResult, ProcessInvoker,
};
pub use process_runner::{run_script, TokioProcessInvoker};
