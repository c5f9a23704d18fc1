//! # TendRS Common Utilities Module
//!
//! File: cli/src/common/mod.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Shared functionality used across the command handlers:
//!
//! - **`exec`**: the external-command executor and the `CommandRunner` seam.
//! - **`docker`**: everything that talks to the container runtime: daemon
//!   checks, state resolution, readiness polling, reconciliation, batches.
//! - **`compose`**: compose-manifest service and image extraction.
//!
pub mod compose;
pub mod docker;
pub mod exec;
