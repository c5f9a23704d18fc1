//! # TendRS Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Central interface for everything that talks to the container runtime.
//! All interaction goes through the `docker` CLI binary via the
//! `common::exec` executor; nothing in here links against a daemon API.
//!
//! ## Architecture
//!
//! - **`daemon`**: is the runtime installed, is the daemon reachable, and
//!   how to launch it.
//! - **`state`**: the closed container-state model, the listing parser, and
//!   the resolver that maps configured names to live records.
//! - **`readiness`**: per-container poll tasks that wait for the running
//!   state under a deadline, with cooperative cancellation.
//! - **`reconcile`**: the start/stop engine over the configured registry.
//! - **`batch`**: best-effort ad-hoc operations over explicit identifiers.
//!
//! Re-exports cover the types command handlers actually touch.
//!
use tracing::debug;

/// Best-effort batch operations over explicit container identifiers.
pub mod batch;
/// Daemon availability checks and launch.
pub mod daemon;
/// Readiness polling with deadline and cancellation.
pub mod readiness;
/// The start/stop reconciliation engine.
pub mod reconcile;
/// Container state model, listing parser, and name resolver.
pub mod state;

// --- Re-exports for easier access from command handlers ---
pub use batch::{Batch, BatchResult, ItemOutcome};
pub use daemon::{Daemon, DaemonStatus};
pub use reconcile::Orchestrator;
pub use state::{ContainerRecord, ContainerState};

/// Logs a one-line summary of a batch report and says whether every item
/// succeeded. Shared by the `container` subcommand handlers.
pub fn batch_ok(results: &[BatchResult]) -> bool {
    let failed = results.iter().filter(|r| !r.succeeded()).count();
    debug!(
        "Batch finished: {} ok, {} failed.",
        results.len() - failed,
        failed
    );
    failed == 0
}

// --- Unit Tests (Module Level) ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_ok_flags_any_failure() {
        let results = vec![
            BatchResult {
                id: "a".into(),
                outcome: ItemOutcome::Succeeded,
            },
            BatchResult {
                id: "b".into(),
                outcome: ItemOutcome::Failed("nope".into()),
            },
        ];
        assert!(!batch_ok(&results));
        assert!(batch_ok(&results[..1]));
        assert!(batch_ok(&[]));
    }
}
