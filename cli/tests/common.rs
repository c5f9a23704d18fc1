//! # TendRS CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files. Each `.rs` file in
//! `cli/tests/` is compiled as a separate test crate against the `tendrs`
//! binary; this module keeps the common scaffolding in one place.
//!
//! The recurring trick: a temporary project directory holding a
//! `.tendrs.toml` whose daemon binary does not exist on any PATH. That makes
//! daemon-dependent commands fail fast and deterministically, with no
//! container runtime needed on the test machine.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Binary name guaranteed to be absent from PATH.
pub const MISSING_RUNTIME: &str = "tendrs-test-no-such-runtime";

/// An `assert_cmd::Command` for the compiled `tendrs` binary.
pub fn tendrs_cmd() -> Command {
    Command::cargo_bin("tendrs").expect("Failed to find tendrs binary for testing")
}

/// A temporary project directory whose `.tendrs.toml` points at a runtime
/// binary that does not exist. Commands run with this as their working
/// directory fail fast on daemon lookup instead of touching a real daemon.
pub fn project_without_runtime(containers: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let list = containers
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let config = format!(
        r#"
[orchestrator]
containers = [{list}]
readiness_timeout_secs = 1
poll_interval_ms = 10

[daemon]
binary = "{MISSING_RUNTIME}"
start_command = ["{MISSING_RUNTIME}", "up"]
"#
    );
    fs::write(dir.path().join(".tendrs.toml"), config).expect("write project config");
    dir
}
