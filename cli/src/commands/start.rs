//! # TendRS Start Command Handler
//!
//! File: cli/src/commands/start.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Implements `tendrs start`: bring every configured container to the
//! running state and wait until each one reports running.
//!
//! ## Architecture
//!
//! 1. Load configuration (registry, daemon binary, poll timings).
//! 2. Build the reconciliation engine over the real executor.
//! 3. Run `start()`; it returns only once every container converged, or
//!    fails with a convergence timeout naming the container that did not.
//!
//! ## Usage
//!
//! ```bash
//! tendrs start
//! ```
//!
use crate::common::docker::Orchestrator;
use crate::core::{config, error::Result};
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

/// Arguments for `tendrs start`. The registry comes from configuration, so
/// no positional arguments exist.
#[derive(Parser, Debug)]
#[command(about = "Start all configured containers and wait for readiness")]
pub struct StartArgs {}

/// Handler for `tendrs start`.
pub async fn handle_start(args: StartArgs) -> Result<()> {
    debug!("Start args: {:?}", args);
    let cfg = config::load_config().context("Failed to load TendRS configuration")?;
    info!(
        "Reconciling {} configured container(s) up...",
        cfg.orchestrator.containers.len()
    );

    let engine = Orchestrator::from_config(&cfg);
    engine.start().await?;

    println!("All configured containers are running.");
    Ok(())
}
