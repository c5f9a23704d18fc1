//! # TendRS Batch Operation Coordinator
//!
//! File: cli/src/common/docker/batch.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Ad-hoc lifecycle commands over explicit container identifiers, outside
//! the configured registry: start, stop, remove, and image pull. This is
//! what the `tendrs container ...` subcommands call.
//!
//! ## Architecture
//!
//! - **Best-effort batches**: the daemon is verified once up front; after
//!   that, every item is attempted regardless of earlier failures. The
//!   caller gets one [`BatchResult`] per requested identifier, in request
//!   order, instead of an early-exit error.
//! - **Remove**: stops the container first and ignores that outcome (it is
//!   usually already stopped), then removes it. Only the removal result is
//!   reported.
//! - Identifiers are passed to the runtime verbatim; names and IDs work
//!   interchangeably, exactly as the runtime accepts them.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker::batch::{Batch, ItemOutcome};
//!
//! # async fn run_example(batch: Batch) -> crate::core::error::Result<()> {
//! for result in batch.stop_containers(&["web".into(), "db".into()]).await? {
//!     if let ItemOutcome::Failed(reason) = &result.outcome {
//!         eprintln!("{}: {}", result.id, reason);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::common::docker::daemon::Daemon;
use crate::common::exec::{argv, CommandRunner};
use crate::core::error::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Per-item outcome of a batch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded,
    /// The runtime rejected the item; carries the failure detail.
    Failed(String),
}

/// One entry of a batch report, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// The identifier exactly as requested (name or ID).
    pub id: String,
    pub outcome: ItemOutcome,
}

impl BatchResult {
    pub fn succeeded(&self) -> bool {
        self.outcome == ItemOutcome::Succeeded
    }
}

/// Coordinator for ad-hoc batch commands against the runtime.
pub struct Batch {
    daemon: Arc<Daemon>,
    runner: Arc<dyn CommandRunner>,
}

impl Batch {
    pub fn new(daemon: Arc<Daemon>) -> Self {
        let runner = daemon.runner();
        Self { daemon, runner }
    }

    /// Starts each listed container, best-effort.
    ///
    /// # Errors
    ///
    /// Only daemon-availability errors; per-item failures are in the report.
    #[instrument(skip(self))]
    pub async fn start_containers(&self, ids: &[String]) -> Result<Vec<BatchResult>> {
        self.run_batch("start", "Starting", ids).await
    }

    /// Stops each listed container, best-effort.
    #[instrument(skip(self))]
    pub async fn stop_containers(&self, ids: &[String]) -> Result<Vec<BatchResult>> {
        self.run_batch("stop", "Stopping", ids).await
    }

    /// Removes each listed container, best-effort.
    ///
    /// Each container is stopped first; that stop's outcome is ignored since
    /// the container is usually not running. Only the removal itself decides
    /// the reported outcome.
    #[instrument(skip(self))]
    pub async fn remove_containers(&self, ids: &[String]) -> Result<Vec<BatchResult>> {
        self.daemon.ensure_running().await?;
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            debug!("Stopping '{}' ahead of removal.", id);
            let _ = self
                .runner
                .run(self.daemon.binary(), &argv(&["stop", id.as_str()]))
                .await;
            info!("Removing container '{}'...", id);
            let out = self
                .runner
                .run(self.daemon.binary(), &argv(&["rm", id.as_str()]))
                .await;
            results.push(self.report(id, "remove", out));
        }
        Ok(results)
    }

    /// Pulls each listed image, best-effort.
    #[instrument(skip(self))]
    pub async fn pull_images(&self, images: &[String]) -> Result<Vec<BatchResult>> {
        self.daemon.ensure_running().await?;
        let mut results = Vec::with_capacity(images.len());
        for image in images {
            info!("Pulling image '{}'...", image);
            let out = self
                .runner
                .run(self.daemon.binary(), &argv(&["pull", image.as_str()]))
                .await;
            results.push(self.report(image, "pull", out));
        }
        Ok(results)
    }

    async fn run_batch(&self, verb: &str, doing: &str, ids: &[String]) -> Result<Vec<BatchResult>> {
        self.daemon.ensure_running().await?;
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            info!("{} container '{}'...", doing, id);
            let out = self
                .runner
                .run(self.daemon.binary(), &argv(&[verb, id.as_str()]))
                .await;
            results.push(self.report(id, verb, out));
        }
        Ok(results)
    }

    fn report(&self, id: &str, verb: &str, out: crate::common::exec::CommandOutput) -> BatchResult {
        let outcome = if out.success {
            debug!("{} of '{}' succeeded.", verb, id);
            ItemOutcome::Succeeded
        } else {
            warn!("{} of '{}' failed: {}", verb, id, out.detail());
            ItemOutcome::Failed(out.detail())
        };
        BatchResult {
            id: id.to_string(),
            outcome,
        }
    }
}
