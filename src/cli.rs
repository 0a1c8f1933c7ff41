// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::types::parse_duration;

/// Command-line arguments for `scripthook`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scripthook",
    version,
    about = "Run alias scripts for matched events, with recurrence throttling.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Scripthook.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read newline-delimited JSON events from this file instead of stdin.
    #[arg(long, value_name = "PATH")]
    pub events: Option<String>,

    /// Kill scripts that run longer than this (e.g. `30s`, `500ms`).
    ///
    /// Overrides `[config].timeout`.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCRIPTHOOK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print configured actions, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
