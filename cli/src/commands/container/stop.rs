//! # TendRS Container Stop Handler
//!
//! File: cli/src/commands/container/stop.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! Stops explicitly named containers as a best-effort batch.
//!
use crate::common::docker::{batch::Batch, daemon::Daemon};
use crate::common::exec::Executor;
use crate::core::{config, error::Result};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(about = "Stop one or more containers by name or ID")]
pub struct StopArgs {
    /// Container names or IDs to stop.
    #[arg(required = true)]
    containers: Vec<String>,
}

pub async fn handle_stop(args: StopArgs) -> Result<()> {
    debug!("Container stop args: {:?}", args);
    let cfg = config::load_config().context("Failed to load TendRS configuration")?;
    let daemon = Arc::new(Daemon::new(&cfg.daemon, Arc::new(Executor::silent())));
    let results = Batch::new(daemon).stop_containers(&args.containers).await?;
    super::report_batch("stop", &results)
}
