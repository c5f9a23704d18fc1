//! # TendRS Commands Module
//!
//! File: cli/src/commands/mod.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Declares the command handlers the CLI routes to:
//!
//! - **`start`** / **`stop`**: reconcile the configured containers up or down.
//! - **`status`**: report daemon availability and per-container state.
//! - **`container`**: ad-hoc batch operations on explicit identifiers
//!   (`start`, `stop`, `rm`, `pull`).
//!
/// Ad-hoc `tendrs container ...` subcommands.
pub mod container;
/// Implements `tendrs start`.
pub mod start;
/// Implements `tendrs status`.
pub mod status;
/// Implements `tendrs stop`.
pub mod stop;
