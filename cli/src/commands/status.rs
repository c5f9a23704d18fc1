//! # TendRS Status Command Handler
//!
//! File: cli/src/commands/status.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Implements `tendrs status`: report whether the container runtime is
//! installed and reachable, then the live state of every configured
//! container. Purely read-only; the daemon is never launched by this
//! command.
//!
//! ## Usage
//!
//! ```bash
//! tendrs status
//! ```
//!
use crate::common::docker::daemon::Daemon;
use crate::common::docker::state::Resolver;
use crate::common::exec::Executor;
use crate::core::{config, error::Result};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

/// Arguments for `tendrs status`.
#[derive(Parser, Debug)]
#[command(about = "Show daemon availability and configured container states")]
pub struct StatusArgs {}

/// Handler for `tendrs status`.
pub async fn handle_status(args: StatusArgs) -> Result<()> {
    debug!("Status args: {:?}", args);
    let cfg = config::load_config().context("Failed to load TendRS configuration")?;

    let daemon = Arc::new(Daemon::new(&cfg.daemon, Arc::new(Executor::silent())));
    let status = daemon.status().await;

    println!("Runtime binary: {}", cfg.daemon.binary);
    println!("  installed: {}", if status.installed { "yes" } else { "no" });
    println!("  daemon running: {}", if status.running { "yes" } else { "no" });

    if cfg.orchestrator.containers.is_empty() {
        println!("No containers configured.");
        return Ok(());
    }
    if !status.running {
        println!("Container states unavailable while the daemon is down.");
        return Ok(());
    }

    let resolver = Resolver::new(daemon, cfg.orchestrator.containers.clone());
    println!("Configured containers:");
    for name in resolver.registry() {
        let records = resolver.container_records(name).await;
        match records.first() {
            Some(record) => println!("  {:<24} {}", name, record.state),
            None => println!("  {:<24} absent", name),
        }
    }
    Ok(())
}
