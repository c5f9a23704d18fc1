//! # TendRS Container Command Group
//!
//! File: cli/src/commands/container/mod.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Ad-hoc lifecycle operations on explicitly named containers, outside the
//! configured registry: `tendrs container start|stop|rm|pull`. All of them
//! are best-effort batches; one failing identifier never aborts the rest,
//! and the per-item outcomes are printed at the end.
//!
//! ## Usage
//!
//! ```bash
//! tendrs container start web db
//! tendrs container stop web
//! tendrs container rm old-app
//! tendrs container pull            # images from the compose manifest
//! tendrs container pull nginx:1.27 # explicit images
//! ```
//!
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Implements `tendrs container pull`.
mod pull;
/// Implements `tendrs container rm`.
mod rm;
/// Implements `tendrs container start`.
mod start;
/// Implements `tendrs container stop`.
mod stop;

/// The `tendrs container` command group.
#[derive(Parser, Debug)]
pub struct ContainerArgs {
    #[command(subcommand)]
    command: ContainerCommand,
}

/// Subcommands available under `tendrs container`.
#[derive(Subcommand, Debug)]
enum ContainerCommand {
    /// Start the named containers.
    Start(start::StartArgs),
    /// Stop the named containers.
    Stop(stop::StopArgs),
    /// Remove the named containers (stopping them first).
    Rm(rm::RmArgs),
    /// Pull images, explicit or discovered from the compose manifest.
    Pull(pull::PullArgs),
}

/// Routes `tendrs container <subcommand>` to its handler.
pub async fn handle_container(args: ContainerArgs) -> Result<()> {
    match args.command {
        ContainerCommand::Start(args) => start::handle_start(args).await,
        ContainerCommand::Stop(args) => stop::handle_stop(args).await,
        ContainerCommand::Rm(args) => rm::handle_rm(args).await,
        ContainerCommand::Pull(args) => pull::handle_pull(args).await,
    }
}

/// Prints a per-item batch report and fails if any item failed.
pub(crate) fn report_batch(verb: &str, results: &[crate::common::docker::BatchResult]) -> Result<()> {
    use crate::common::docker::ItemOutcome;
    for result in results {
        match &result.outcome {
            ItemOutcome::Succeeded => println!("{}: {} ok", result.id, verb),
            ItemOutcome::Failed(reason) => println!("{}: {} FAILED ({})", result.id, verb, reason),
        }
    }
    if crate::common::docker::batch_ok(results) {
        Ok(())
    } else {
        let failed = results.iter().filter(|r| !r.succeeded()).count();
        Err(anyhow::anyhow!(
            "{failed} of {} {verb} operation(s) failed",
            results.len()
        ))
    }
}
