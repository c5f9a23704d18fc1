//! # TendRS Container State Resolver
//!
//! File: cli/src/common/docker/state.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module maps configured container names onto their live runtime
//! attributes by querying the daemon's full container listing. Everything it
//! produces is a query-derived snapshot: nothing is cached or persisted, so
//! idempotency comes from asking the daemon again, not from bookkeeping.
//!
//! ## Architecture
//!
//! - **`ContainerState`**: the closed set of lifecycle states the runtime
//!   reports. All string matching against runtime-reported status text is
//!   isolated in the single [`ContainerState::classify`] function.
//! - **`ContainerRecord`**: `{id, name, state}` projected from one listing
//!   entry for one configured name.
//! - **`ReadinessOutcome`**: `NotAvailable | NotStarted | Started`, computed
//!   by [`readiness_of`] from a record set.
//! - **`Resolver`**: owns the configured registry and a daemon handle.
//!   `container_records` resolves one name; `all_records` fans out over the
//!   whole registry and flattens.
//!
//! Fault posture: the resolver never propagates a listing crash. A failed
//! listing, an unreachable daemon, or a malformed line all degrade to an
//! empty (or shorter) result plus a log entry. Callers must treat an empty
//! list as "unknown" when the daemon itself is unavailable, not as "absent".
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker::state::{readiness_of, ReadinessOutcome, Resolver};
//!
//! # async fn run_example(resolver: Resolver) {
//! let records = resolver.container_records("web").await;
//! match readiness_of(&records, "web") {
//!     ReadinessOutcome::Started => println!("web is up"),
//!     ReadinessOutcome::NotStarted => println!("web exists but is not running"),
//!     ReadinessOutcome::NotAvailable => println!("web is absent from the listing"),
//! }
//! # }
//! ```
//!
use crate::common::docker::daemon::{Daemon, DaemonReady};
use crate::common::exec::{argv, CommandRunner};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Closed set of container lifecycle states reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    /// The runtime reported something this version does not recognize.
    Unknown,
}

impl ContainerState {
    /// The single place runtime-reported status text is interpreted.
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            other => {
                debug!("Unrecognized container state '{}'.", other);
                Self::Unknown
            }
        }
    }

    /// True only for the literal running state.
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Exited => "exited",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// One configured container's live attributes, projected from the listing.
/// Transient: produced per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Runtime identifier (full, untruncated).
    pub id: String,
    /// The configured name this record was resolved for.
    pub name: String,
    /// Classified lifecycle state.
    pub state: ContainerState,
}

/// Readiness of one configured container, derived from a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// The container was absent from the live listing.
    NotAvailable,
    /// Present, but not in the running state.
    NotStarted,
    /// Present and running.
    Started,
}

/// Classifies readiness of `name` against a resolved record set.
pub fn readiness_of(records: &[ContainerRecord], name: &str) -> ReadinessOutcome {
    match records.iter().find(|r| r.name == name) {
        Some(r) if r.state.is_running() => ReadinessOutcome::Started,
        Some(_) => ReadinessOutcome::NotStarted,
        None => ReadinessOutcome::NotAvailable,
    }
}

/// One raw line of the live listing before any name filtering.
#[derive(Debug, Clone)]
struct ListedContainer {
    id: String,
    names: Vec<String>,
    state: ContainerState,
}

/// Tab-separated format handed to the runtime so the listing is stable to
/// parse regardless of column widths.
const LISTING_FORMAT: &str = "{{.ID}}\t{{.Names}}\t{{.State}}";

/// Parses the tab-separated listing output, skipping malformed lines.
fn parse_listing(text: &str) -> Vec<ListedContainer> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(3, '\t');
        let (Some(id), Some(names), Some(state)) = (parts.next(), parts.next(), parts.next())
        else {
            warn!("Skipping malformed listing line: {:?}", line);
            continue;
        };
        entries.push(ListedContainer {
            id: id.to_string(),
            // A container can carry several names, comma-separated.
            names: names.split(',').map(|n| n.trim().to_string()).collect(),
            state: ContainerState::classify(state),
        });
    }
    entries
}

/// Resolves configured container names to live [`ContainerRecord`]s.
pub struct Resolver {
    daemon: Arc<Daemon>,
    registry: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl Resolver {
    /// Builds a resolver over the configured container registry.
    pub fn new(daemon: Arc<Daemon>, registry: Vec<String>) -> Self {
        let runner = daemon.runner();
        Self {
            daemon,
            registry,
            runner,
        }
    }

    /// The configured container registry, in declaration order.
    pub fn registry(&self) -> &[String] {
        &self.registry
    }

    /// The daemon handle this resolver queries through.
    pub fn daemon(&self) -> &Arc<Daemon> {
        &self.daemon
    }

    /// Resolves one configured name against the live listing.
    ///
    /// Returns an empty list when the daemon is unavailable (after logging a
    /// warning) or when the listing fails (after logging an error). An empty
    /// result therefore means "unknown" whenever the daemon itself was the
    /// problem, and "absent" only when the daemon answered.
    #[instrument(skip(self))]
    pub async fn container_records(&self, name: &str) -> Vec<ContainerRecord> {
        match self.daemon.ensure_running().await {
            Ok(DaemonReady::Ready) => {}
            Ok(DaemonReady::Starting) => {
                warn!(
                    "Daemon is still starting; treating state of '{}' as unknown.",
                    name
                );
                return Vec::new();
            }
            Err(e) => {
                warn!("Daemon unavailable while resolving '{}': {}", name, e);
                return Vec::new();
            }
        }

        let listing = self
            .runner
            .run(
                self.daemon.binary(),
                &argv(&["ps", "--all", "--no-trunc", "--format", LISTING_FORMAT]),
            )
            .await;
        if !listing.success {
            error!(
                "Container listing failed while resolving '{}': {}",
                name,
                listing.detail()
            );
            return Vec::new();
        }

        parse_listing(&listing.output)
            .into_iter()
            .filter(|entry| entry.names.iter().any(|n| n == name))
            .map(|entry| ContainerRecord {
                id: entry.id,
                name: name.to_string(),
                state: entry.state,
            })
            .collect()
    }

    /// Resolves every configured name, flattening the results in registry
    /// order. An empty registry yields an empty list with a warning, not an
    /// error.
    #[instrument(skip(self))]
    pub async fn all_records(&self) -> Vec<ContainerRecord> {
        if self.registry.is_empty() {
            warn!("No containers configured; nothing to resolve.");
            return Vec::new();
        }
        let mut records = Vec::new();
        for name in &self.registry {
            records.extend(self.container_records(name).await);
        }
        records
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::exec::testing::ScriptedRunner;
    use crate::common::exec::CommandOutput;
    use crate::core::config::DaemonConfig;

    fn daemon_with(runner: Arc<ScriptedRunner>) -> Arc<Daemon> {
        let cfg = DaemonConfig {
            binary: "sh".to_string(),
            start_command: vec!["sh".to_string(), "-launch".to_string()],
        };
        Arc::new(Daemon::new(&cfg, runner))
    }

    /// Scripted listing: probe succeeds, `ps --all` returns the given body.
    fn listing_runner(body: &'static str) -> Arc<ScriptedRunner> {
        Arc::new(ScriptedRunner::new(move |_, args| {
            if args.contains(&"--all".to_string()) {
                CommandOutput::ok(body)
            } else {
                CommandOutput::ok("")
            }
        }))
    }

    #[test]
    fn test_classify_known_states() {
        assert_eq!(ContainerState::classify("running"), ContainerState::Running);
        assert_eq!(ContainerState::classify("Exited"), ContainerState::Exited);
        assert_eq!(ContainerState::classify(" paused "), ContainerState::Paused);
        assert_eq!(ContainerState::classify("created"), ContainerState::Created);
        assert_eq!(
            ContainerState::classify("weird-new-state"),
            ContainerState::Unknown
        );
    }

    #[test]
    fn test_is_running_only_for_running() {
        assert!(ContainerState::Running.is_running());
        assert!(!ContainerState::Exited.is_running());
        assert!(!ContainerState::Unknown.is_running());
    }

    #[test]
    fn test_parse_listing_skips_malformed_lines() {
        let text = "abc\tweb\trunning\nnot-a-valid-line\n\ndef\tdb,db-alias\texited\n";
        let entries = parse_listing(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "abc");
        assert_eq!(entries[1].names, vec!["db", "db-alias"]);
        assert_eq!(entries[1].state, ContainerState::Exited);
    }

    #[test]
    fn test_readiness_of() {
        let records = vec![
            ContainerRecord {
                id: "abc".into(),
                name: "web".into(),
                state: ContainerState::Running,
            },
            ContainerRecord {
                id: "def".into(),
                name: "db".into(),
                state: ContainerState::Exited,
            },
        ];
        assert_eq!(readiness_of(&records, "web"), ReadinessOutcome::Started);
        assert_eq!(readiness_of(&records, "db"), ReadinessOutcome::NotStarted);
        assert_eq!(
            readiness_of(&records, "cache"),
            ReadinessOutcome::NotAvailable
        );
    }

    #[tokio::test]
    async fn test_container_records_filters_by_name() {
        let runner = listing_runner("abc\tweb\trunning\ndef\tdb\texited\n");
        let resolver = Resolver::new(daemon_with(runner), vec!["web".into(), "db".into()]);
        let records = resolver.container_records("web").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "abc");
        assert_eq!(records[0].name, "web");
        assert!(records[0].state.is_running());
    }

    /// A failed listing command degrades to an empty list, never an error.
    #[tokio::test]
    async fn test_container_records_empty_on_listing_failure() {
        let runner = Arc::new(ScriptedRunner::new(|_, args| {
            if args.contains(&"--all".to_string()) {
                CommandOutput::failed(1, "daemon hiccup")
            } else {
                CommandOutput::ok("")
            }
        }));
        let resolver = Resolver::new(daemon_with(runner), vec!["web".into()]);
        assert!(resolver.container_records("web").await.is_empty());
    }

    /// Daemon unavailable (probe fails, launch fails) also degrades to empty.
    #[tokio::test]
    async fn test_container_records_empty_when_daemon_down() {
        let runner = Arc::new(ScriptedRunner::new(|_, _| {
            CommandOutput::failed(1, "down")
        }));
        let resolver = Resolver::new(daemon_with(runner), vec!["web".into()]);
        assert!(resolver.container_records("web").await.is_empty());
    }

    #[tokio::test]
    async fn test_all_records_fans_out_in_registry_order() {
        let runner = listing_runner("abc\tweb\trunning\ndef\tdb\texited\n");
        let resolver = Resolver::new(
            daemon_with(runner),
            vec!["db".into(), "web".into(), "ghost".into()],
        );
        let records = resolver.all_records().await;
        // Registry order: db first, then web; ghost is absent.
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "db");
        assert_eq!(records[1].name, "web");
    }

    #[tokio::test]
    async fn test_all_records_empty_registry() {
        let runner = listing_runner("abc\tweb\trunning\n");
        let resolver = Resolver::new(daemon_with(runner), Vec::new());
        assert!(resolver.all_records().await.is_empty());
    }
}
