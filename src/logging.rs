// src/logging.rs

//! Subscriber setup for the `scripthook` binary.
//!
//! Filter selection:
//! 1. `--log-level` wins and applies to every target.
//! 2. Otherwise `SCRIPTHOOK_LOG` is read as an `EnvFilter` directive string,
//!    so both `debug` and `scripthook::exec=debug,info` work.
//! 3. Otherwise `info`.
//!
//! Output goes to stderr, keeping stdout free for `--dry-run`. Script
//! failures are reported here and nowhere else.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding the default filter directives.
pub const LOG_ENV: &str = "SCRIPTHOOK_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing log subscriber")
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::default().add_directive(level_filter(level).into());
    }

    env.and_then(|directives| EnvFilter::try_new(directives.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
