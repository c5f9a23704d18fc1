//! # TendRS Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module aggregates the core, foundational infrastructure of the
//! application: configuration loading and the shared error system. These are
//! the pieces everything else builds on, with no dependency on any specific
//! command or on the container runtime itself.
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{Result, TendrsError}; // For error handling
//! ```
//!
//! These modules provide foundational capabilities that are used across
//! different parts of the application, ensuring consistent behavior.
//!
pub mod config;
pub mod error;
