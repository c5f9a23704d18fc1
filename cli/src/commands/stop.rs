//! # TendRS Stop Command Handler
//!
//! File: cli/src/commands/stop.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Implements `tendrs stop`: issue a stop for every configured container.
//! Already-stopped containers are a runtime-level no-op, so the command is
//! safe to repeat.
//!
//! ## Usage
//!
//! ```bash
//! tendrs stop
//! ```
//!
use crate::common::docker::Orchestrator;
use crate::core::{config, error::Result};
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

/// Arguments for `tendrs stop`.
#[derive(Parser, Debug)]
#[command(about = "Stop all configured containers")]
pub struct StopArgs {}

/// Handler for `tendrs stop`.
pub async fn handle_stop(args: StopArgs) -> Result<()> {
    debug!("Stop args: {:?}", args);
    let cfg = config::load_config().context("Failed to load TendRS configuration")?;
    info!(
        "Reconciling {} configured container(s) down...",
        cfg.orchestrator.containers.len()
    );

    let engine = Orchestrator::from_config(&cfg);
    engine.stop().await?;

    println!("Stop issued for all configured containers.");
    Ok(())
}
