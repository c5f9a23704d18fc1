//! # TendRS Readiness Poller
//!
//! File: cli/src/common/docker/readiness.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module watches a single container until it reports the running
//! state. Each watch is an independent tokio task; the reconciliation engine
//! spawns one per configured container and awaits them all, so containers
//! converge concurrently with no ordering guarantee between them.
//!
//! ## Architecture
//!
//! - **`PollOptions`**: fixed poll interval plus an explicit deadline. A
//!   container that never reaches running resolves to `TimedOut` instead of
//!   looping forever.
//! - **Cancellation**: a `tokio::sync::watch` channel checked between
//!   iterations. Cancellation is cooperative; an in-flight listing command
//!   is allowed to finish before the task notices.
//! - **`check_running`**: verifies the daemon first; if the daemon is
//!   unavailable it logs a warning and returns `None` so the caller never
//!   waits on a poller that was never started.
//!
//! Pollers touch no shared mutable state: every iteration re-resolves the
//! container from the live listing, so no locking is needed anywhere.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker::readiness::{check_running, PollOptions};
//! use tokio::sync::watch;
//!
//! # async fn run_example(resolver: std::sync::Arc<crate::common::docker::state::Resolver>) {
//! let (cancel_tx, cancel_rx) = watch::channel(false);
//! if let Some(handle) = check_running(resolver, "web".into(), PollOptions::default(), cancel_rx).await {
//!     let outcome = handle.await;
//!     // cancel_tx.send(true) would have stopped the poller cooperatively.
//! }
//! # drop(cancel_tx);
//! # }
//! ```
//!
use crate::common::docker::state::{readiness_of, ReadinessOutcome, Resolver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Timing knobs for one readiness watch.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Fixed sleep between poll iterations.
    pub interval: Duration,
    /// Total time budget before the watch gives up.
    pub deadline: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            deadline: Duration::from_secs(60),
        }
    }
}

/// Terminal state of one readiness watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The container reported running.
    Converged,
    /// The deadline elapsed first.
    TimedOut,
    /// The cancellation channel fired first.
    Cancelled,
}

/// Starts an independent readiness watch for `name`.
///
/// Verifies the daemon before spawning: on a daemon error this logs a
/// warning and returns `None`, and the caller must not wait for a poller
/// that was never started. A daemon that is merely still `Starting` is fine;
/// the watch will observe the container as soon as the daemon answers.
pub async fn check_running(
    resolver: Arc<Resolver>,
    name: String,
    opts: PollOptions,
    cancel: watch::Receiver<bool>,
) -> Option<JoinHandle<PollOutcome>> {
    if let Err(e) = resolver.daemon().ensure_running().await {
        warn!("Not polling '{}': daemon unavailable ({}).", name, e);
        return None;
    }
    Some(tokio::spawn(watch_until_running(
        resolver, name, opts, cancel,
    )))
}

/// The poll loop itself. Runs on its own task; one per container.
async fn watch_until_running(
    resolver: Arc<Resolver>,
    name: String,
    opts: PollOptions,
    cancel: watch::Receiver<bool>,
) -> PollOutcome {
    let deadline = Instant::now() + opts.deadline;
    loop {
        if *cancel.borrow() {
            info!("Readiness watch for '{}' cancelled.", name);
            return PollOutcome::Cancelled;
        }

        let records = resolver.container_records(&name).await;
        match readiness_of(&records, &name) {
            ReadinessOutcome::Started => {
                info!("Container '{}' is running.", name);
                return PollOutcome::Converged;
            }
            outcome => {
                debug!("Container '{}' not ready yet: {:?}", name, outcome);
            }
        }

        if Instant::now() >= deadline {
            warn!(
                "Container '{}' did not reach running within {:?}.",
                name, opts.deadline
            );
            return PollOutcome::TimedOut;
        }
        tokio::time::sleep(opts.interval).await;
    }
}
