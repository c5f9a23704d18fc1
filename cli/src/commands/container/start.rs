//! # TendRS Container Start Handler
//!
//! File: cli/src/commands/container/start.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! Starts explicitly named containers as a best-effort batch. Unlike
//! `tendrs start`, nothing is read from the configured registry and no
//! readiness wait happens; this is a direct pass-through to the runtime.
//!
use crate::common::docker::{batch::Batch, daemon::Daemon};
use crate::common::exec::Executor;
use crate::core::{config, error::Result};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(about = "Start one or more containers by name or ID")]
pub struct StartArgs {
    /// Container names or IDs to start.
    #[arg(required = true)]
    containers: Vec<String>,
}

pub async fn handle_start(args: StartArgs) -> Result<()> {
    debug!("Container start args: {:?}", args);
    let cfg = config::load_config().context("Failed to load TendRS configuration")?;
    let daemon = Arc::new(Daemon::new(&cfg.daemon, Arc::new(Executor::silent())));
    let results = Batch::new(daemon).start_containers(&args.containers).await?;
    super::report_batch("start", &results)
}
