//! # TendRS Reconciliation Engine
//!
//! File: cli/src/common/docker/reconcile.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module implements the top-level start/stop sequence: compare the
//! configured container registry against live daemon state, issue corrective
//! commands, and wait for convergence. It is the piece `tendrs start` and
//! `tendrs stop` call directly.
//!
//! ## Architecture
//!
//! - **`Orchestrator`**: built from the loaded configuration; holds the
//!   daemon handle, the resolver over the configured registry, and the poll
//!   timing knobs. Registry and daemon-launch command arrive as explicit
//!   constructor inputs, never through ambient globals.
//! - **`start`**: ensure the daemon, list live state, start every configured
//!   container that is not running (sequentially, in registry order), then
//!   spawn a readiness watch for *every* configured container (including
//!   the already-running ones, which converge on their first check) and
//!   await them all.
//! - **`stop`**: ensure the daemon, then issue a stop for every resolved
//!   identifier unconditionally; stopping an already-stopped container is
//!   the runtime's no-op, not ours.
//! - **Single-flight**: an internal async mutex serializes concurrent
//!   `start()`/`stop()` calls on the same engine instance. Two separate
//!   engine instances still race at the daemon, which is treated as an
//!   external, concurrency-safe service.
//!
//! Per-container command failures are logged and do not abort the pass;
//! daemon-availability errors propagate to the caller verbatim.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker::reconcile::Orchestrator;
//!
//! # async fn run_example(cfg: crate::core::config::Config) -> crate::core::error::Result<()> {
//! let engine = Orchestrator::from_config(&cfg);
//! engine.start().await?; // returns once every configured container runs
//! engine.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
use crate::common::docker::daemon::{Daemon, DaemonReady};
use crate::common::docker::readiness::{check_running, PollOptions, PollOutcome};
use crate::common::docker::state::Resolver;
use crate::common::exec::{argv, CommandRunner, Executor};
use crate::core::{config::Config, error::Result, error::TendrsError};
use anyhow::{anyhow, Context};
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// The reconciliation engine over one configured container registry.
pub struct Orchestrator {
    resolver: Arc<Resolver>,
    runner: Arc<dyn CommandRunner>,
    poll: PollOptions,
    // Grace period handed to the runtime's stop command, as its -t argument.
    stop_timeout_arg: String,
    // Single-flight guard: serializes start/stop on this instance.
    flight: Mutex<()>,
}

impl Orchestrator {
    /// Builds an engine from configuration with an explicit runner.
    pub fn new(cfg: &Config, runner: Arc<dyn CommandRunner>) -> Self {
        let daemon = Arc::new(Daemon::new(&cfg.daemon, Arc::clone(&runner)));
        let resolver = Arc::new(Resolver::new(daemon, cfg.orchestrator.containers.clone()));
        Self {
            resolver,
            runner,
            poll: PollOptions {
                interval: cfg.orchestrator.poll_interval(),
                deadline: cfg.orchestrator.readiness_timeout(),
            },
            stop_timeout_arg: cfg.stop_timeout_arg(),
            flight: Mutex::new(()),
        }
    }

    /// Builds an engine backed by the real (silent) executor.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg, Arc::new(Executor::silent()))
    }

    fn binary(&self) -> &str {
        self.resolver.daemon().binary()
    }

    /// Ensures the daemon is actually reachable before reconciliation.
    ///
    /// `ensure_running` deliberately does not block on bootstrap, so after a
    /// `Starting` outcome this polls `status()` (bounded by the readiness
    /// deadline) until the daemon answers.
    async fn await_daemon(&self) -> Result<()> {
        match self.resolver.daemon().ensure_running().await? {
            DaemonReady::Ready => Ok(()),
            DaemonReady::Starting => {
                info!("Waiting for the daemon to become reachable...");
                let deadline = Instant::now() + self.poll.deadline;
                loop {
                    if self.resolver.daemon().status().await.running {
                        info!("Daemon is reachable.");
                        return Ok(());
                    }
                    if Instant::now() >= deadline {
                        return Err(TendrsError::DaemonStartFailed {
                            details: format!(
                                "daemon did not become reachable within {:?}",
                                self.poll.deadline
                            ),
                        }
                        .into());
                    }
                    tokio::time::sleep(self.poll.interval).await;
                }
            }
        }
    }

    /// Brings every configured container to the running state.
    ///
    /// Returns only once every readiness watch has converged; a container
    /// that never reaches running surfaces as
    /// `TendrsError::ConvergenceTimeout` rather than a hang.
    ///
    /// # Errors
    ///
    /// Daemon-availability errors from `ensure_running` propagate verbatim.
    /// Per-container start failures are logged, not returned; they show up
    /// as convergence timeouts if the container stays down.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<()> {
        let _flight = self.flight.lock().await;
        self.await_daemon().await?;

        let registry = self.resolver.registry().to_vec();
        if registry.is_empty() {
            warn!("No containers configured; start is a no-op.");
            return Ok(());
        }

        // Corrective pass: start whatever is not running, in registry order.
        let records = self.resolver.all_records().await;
        for record in &records {
            if record.state.is_running() {
                debug!("Container '{}' already running.", record.name);
                continue;
            }
            info!("Starting container '{}' ({})...", record.name, record.id);
            let out = self
                .runner
                .run(self.binary(), &argv(&["start", record.id.as_str()]))
                .await;
            if out.success {
                info!("Start issued for '{}'.", record.name);
            } else {
                warn!("Failed to start '{}': {}", record.name, out.detail());
            }
        }

        // Convergence pass: watch every configured container, including the
        // ones that were already running (those converge on first check).
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut names = Vec::new();
        let mut handles = Vec::new();
        for name in &registry {
            match check_running(
                Arc::clone(&self.resolver),
                name.clone(),
                self.poll,
                cancel_rx.clone(),
            )
            .await
            {
                Some(handle) => {
                    names.push(name.clone());
                    handles.push(handle);
                }
                None => warn!("Skipping readiness wait for '{}'.", name),
            }
        }
        let results = join_all(handles).await;
        drop(cancel_tx);

        for (name, result) in names.iter().zip(results) {
            match result {
                Ok(PollOutcome::Converged) => {}
                Ok(PollOutcome::TimedOut) => {
                    return Err(TendrsError::ConvergenceTimeout {
                        name: name.clone(),
                        timeout_secs: self.poll.deadline.as_secs(),
                    }
                    .into());
                }
                Ok(PollOutcome::Cancelled) => {
                    return Err(anyhow!("readiness watch for '{}' was cancelled", name));
                }
                Err(e) => {
                    return Err(anyhow!(e))
                        .with_context(|| format!("Readiness watch for '{}' failed", name));
                }
            }
        }

        info!("All configured containers are running.");
        Ok(())
    }

    /// Stops every configured container.
    ///
    /// Issues a stop for each resolved identifier unconditionally, with no
    /// pre-filtering by state; the runtime treats stopping a stopped
    /// container as a no-op success.
    ///
    /// # Errors
    ///
    /// Daemon-availability errors from `ensure_running` propagate verbatim.
    /// Per-container stop failures are logged, not returned.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<()> {
        let _flight = self.flight.lock().await;
        self.await_daemon().await?;

        if self.resolver.registry().is_empty() {
            warn!("No containers configured; stop is a no-op.");
            return Ok(());
        }

        let records = self.resolver.all_records().await;
        if records.is_empty() {
            warn!("No live records for the configured containers; nothing to stop.");
            return Ok(());
        }
        for record in &records {
            info!("Stopping container '{}' ({})...", record.name, record.id);
            let out = self
                .runner
                .run(
                    self.binary(),
                    &argv(&["stop", "-t", &self.stop_timeout_arg, record.id.as_str()]),
                )
                .await;
            if out.success {
                info!("Stopped '{}'.", record.name);
            } else {
                warn!("Failed to stop '{}': {}", record.name, out.detail());
            }
        }

        info!("Stop pass complete.");
        Ok(())
    }
}
