//! # TendRS Container Remove Handler
//!
//! File: cli/src/commands/container/rm.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! Removes explicitly named containers. Each one is stopped first; a
//! "wasn't running" stop is expected and ignored, and only the removal
//! itself decides the per-item outcome.
//!
use crate::common::docker::{batch::Batch, daemon::Daemon};
use crate::common::exec::Executor;
use crate::core::{config, error::Result};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(about = "Remove one or more containers by name or ID")]
pub struct RmArgs {
    /// Container names or IDs to remove.
    #[arg(required = true)]
    containers: Vec<String>,
}

pub async fn handle_rm(args: RmArgs) -> Result<()> {
    debug!("Container rm args: {:?}", args);
    let cfg = config::load_config().context("Failed to load TendRS configuration")?;
    let daemon = Arc::new(Daemon::new(&cfg.daemon, Arc::new(Executor::silent())));
    let results = Batch::new(daemon)
        .remove_containers(&args.containers)
        .await?;
    super::report_batch("remove", &results)
}
