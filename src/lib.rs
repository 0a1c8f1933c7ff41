// src/lib.rs

pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod feed;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod trigger;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::ConfigFile;
use crate::engine::{ActionDispatcher, Runtime, RuntimeEvent};
use crate::exec::{ProcessInvoker, TokioProcessInvoker};
use crate::feed::{spawn_blocking_feed_reader, spawn_feed_reader};

pub use crate::model::{Alias, Event, Protocol};
pub use crate::recurrence::RecurrencePolicy;
pub use crate::trigger::{ActionError, ActionOutcome, ScriptTrigger};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the alias → action dispatcher and its process invoker
/// - the event feed (stdin or `--events` file)
/// - Ctrl-C handling
/// - the runtime loop
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let timeout = args.timeout.or_else(|| cfg.script_timeout());
    info!(?timeout, aliases = cfg.alias.len(), "configuration loaded");

    let invoker: Arc<dyn ProcessInvoker> = Arc::new(TokioProcessInvoker::with_timeout(timeout));
    let dispatcher = Arc::new(ActionDispatcher::from_config(&cfg, invoker));

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    match args.events {
        Some(ref path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening event feed {path}"))?;
            spawn_feed_reader(file, rt_tx.clone());
        }
        None => {
            spawn_blocking_feed_reader(std::io::stdin(), rt_tx.clone())
                .context("starting stdin feed reader")?;
        }
    }

    // Ctrl-C → shutdown, killing in-flight scripts.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    let summary = Runtime::new(dispatcher, rt_rx).run().await;
    info!(
        fired = summary.fired,
        throttled = summary.throttled,
        inert = summary.inert,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "scripthook finished"
    );

    Ok(())
}

/// Simple dry-run output: print aliases and their actions.
fn print_dry_run(cfg: &ConfigFile) {
    println!("scripthook dry-run");
    match cfg.config.timeout {
        Some(ref t) => println!("  config.timeout = {t}"),
        None => println!("  config.timeout = (none)"),
    }
    println!();

    // Descriptions come from real triggers so they match what would run.
    let invoker: Arc<dyn ProcessInvoker> = Arc::new(TokioProcessInvoker::new());
    let dispatcher = ActionDispatcher::from_config(cfg, invoker);

    println!("aliases ({}):", cfg.alias.len());
    for alias in dispatcher.aliases() {
        println!("  - {alias}");
        let triggers = dispatcher.triggers_for(alias.name());
        if triggers.is_empty() {
            println!("      (no actions)");
        }
        for trigger in triggers {
            println!("      {}", trigger.describe());
            if let Some(script) = trigger.script() {
                println!("        script: {}", script.display());
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
