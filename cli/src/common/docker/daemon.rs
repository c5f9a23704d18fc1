//! # TendRS Daemon Availability Checker
//!
//! File: cli/src/common/docker/daemon.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module answers the two questions every other docker component asks
//! first: is the container runtime installed, and is its daemon reachable?
//! It also knows how to request a daemon launch when the runtime is
//! installed but not running.
//!
//! ## Architecture
//!
//! - **`DaemonStatus`**: `{installed, running}`, derived freshly on every
//!   query and never cached. `running` implies `installed`.
//! - **`Daemon::status`**: `which`-style search-path lookup of the runtime
//!   binary, then a lightweight listing probe (`docker ps -q`) whose success
//!   flag becomes `running`.
//! - **`Daemon::ensure_running`**: idempotent bootstrap. Already running is
//!   an immediate `Ready`; installed-but-stopped issues the configured
//!   platform launch command and reports `Starting`; missing runtime is
//!   `TendrsError::DaemonNotInstalled`.
//!
//! The binary name and launch command are constructor parameters taken from
//! the loaded configuration; this module performs no ambient lookups.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker::daemon::{Daemon, DaemonReady};
//!
//! # async fn run_example(daemon: Daemon) -> crate::core::error::Result<()> {
//! match daemon.ensure_running().await? {
//!     DaemonReady::Ready => { /* safe to issue container commands */ }
//!     DaemonReady::Starting => {
//!         // Launch was requested; poll `status()` until `running` is true
//!         // before issuing commands.
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
use crate::common::exec::{argv, CommandRunner};
use crate::core::{config::DaemonConfig, error::TendrsError};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Snapshot of daemon availability. Derived freshly on every query.
///
/// Invariant: `running` implies `installed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaemonStatus {
    /// The runtime binary was found on the search path.
    pub installed: bool,
    /// The lightweight listing probe succeeded, so the daemon is reachable.
    pub running: bool,
}

/// Outcome of a successful `ensure_running` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonReady {
    /// The daemon was already reachable; nothing was done.
    Ready,
    /// The launch command was issued. The daemon is *not* necessarily
    /// reachable yet; callers needing readiness must poll [`Daemon::status`].
    Starting,
}

/// Handle on the container runtime daemon: knows the binary name, the
/// platform launch command, and the executor to issue probes through.
pub struct Daemon {
    binary: String,
    start_command: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl Daemon {
    /// Builds a checker from the `[daemon]` configuration section.
    pub fn new(cfg: &DaemonConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: cfg.binary.clone(),
            start_command: cfg.start_command.clone(),
            runner,
        }
    }

    /// Name of the runtime binary (e.g. `docker`).
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// The executor this daemon handle issues commands through.
    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::clone(&self.runner)
    }

    /// Derives a fresh [`DaemonStatus`].
    ///
    /// Locates the runtime binary on the search path; if absent, both flags
    /// are false and no command is issued. If present, a lightweight listing
    /// probe determines `running`.
    #[instrument(skip(self))]
    pub async fn status(&self) -> DaemonStatus {
        if which::which(&self.binary).is_err() {
            debug!("Runtime binary '{}' not found on PATH.", self.binary);
            return DaemonStatus {
                installed: false,
                running: false,
            };
        }
        let probe = self.runner.run(&self.binary, &argv(&["ps", "-q"])).await;
        debug!(
            "Daemon probe for '{}': success={} exit={}",
            self.binary, probe.success, probe.exit_code
        );
        DaemonStatus {
            installed: true,
            running: probe.success,
        }
    }

    /// Ensures the daemon is reachable or at least launching.
    ///
    /// Safe to call repeatedly: when the daemon is already running this is a
    /// pure no-op returning `Ready`. When it is installed but stopped, the
    /// configured launch command is issued and `Starting` is returned
    /// *without* waiting for the daemon to come up.
    ///
    /// Despite the read-like name, this call may spawn an external daemon
    /// process. Calling it twice while the daemon is still booting issues
    /// the launch command twice; that is harmless but wasteful.
    ///
    /// # Errors
    ///
    /// * `TendrsError::DaemonNotInstalled` - the runtime binary is absent.
    /// * `TendrsError::DaemonStartFailed` - the launch command itself failed.
    #[instrument(skip(self))]
    pub async fn ensure_running(&self) -> crate::core::error::Result<DaemonReady> {
        let status = self.status().await;
        if status.running {
            debug!("Daemon already running; nothing to do.");
            return Ok(DaemonReady::Ready);
        }
        if !status.installed {
            error!(
                "Container runtime '{}' is not installed; cannot continue.",
                self.binary
            );
            return Err(TendrsError::DaemonNotInstalled {
                binary: self.binary.clone(),
            }
            .into());
        }

        let (program, args) = self
            .start_command
            .split_first()
            .ok_or_else(|| TendrsError::Config("Daemon start command is empty.".to_string()))?;
        info!(
            "Daemon not running; launching via: {}",
            self.start_command.join(" ")
        );
        let launch = self.runner.run(program, args).await;
        if launch.success {
            info!("Daemon launch requested; it may take a moment to come up.");
            Ok(DaemonReady::Starting)
        } else {
            error!("Daemon launch command failed: {}", launch.detail());
            Err(TendrsError::DaemonStartFailed {
                details: launch.detail(),
            }
            .into())
        }
    }
}
