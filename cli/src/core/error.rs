//! # TendRS Error Types
//!
//! File: cli/src/core/error.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used throughout
//! the TendRS application. It provides a consistent approach to error management
//! with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `TendrsError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover various domains:
//! - Configuration errors
//! - Daemon bootstrap errors (runtime not installed, launch failure)
//! - Reconciliation convergence errors
//! - Compose manifest errors
//!
//! Transient per-command failures are not errors at all: they are captured
//! in `CommandOutput` and handled (or logged) at the call site.
//!
//! ## Examples
//!
//! Using the error system:
//!
//! ```rust
//! // Return a specific error type
//! if !status.installed {
//!     return Err(TendrsError::DaemonNotInstalled { binary: "docker".into() })?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
//!
//! // Pattern matching on error types
//! match result {
//!     Ok(value) => println!("Success: {:?}", value),
//!     Err(e) if e.downcast_ref::<TendrsError>().map_or(false, |te| matches!(te, TendrsError::DaemonNotInstalled { .. })) => {
//!         eprintln!("Install the container runtime first.");
//!     },
//!     Err(e) => return Err(e),
//! }
//! ```
//!
//! The error system provides detailed error messages to the user and
//! includes context information for debugging.
//!
use thiserror::Error;

/// Custom error type for the TendRS application.
#[derive(Error, Debug)]
pub enum TendrsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Container runtime is not installed (binary '{binary}' not found on PATH).")]
    DaemonNotInstalled { binary: String },

    #[error("Failed to launch the container runtime daemon: {details}")]
    DaemonStartFailed { details: String },

    #[error("Container '{name}' did not reach the running state within {timeout_secs}s.")]
    ConvergenceTimeout { name: String, timeout_secs: u64 },

    #[error("Failed to read compose manifest: {0}")]
    ManifestFetch(String),

    #[error("Failed to parse compose manifest: {0}")]
    ManifestParse(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = TendrsError::Config("Missing setting 'containers'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'containers'"
        );

        let not_installed = TendrsError::DaemonNotInstalled {
            binary: "docker".into(),
        };
        assert_eq!(
            not_installed.to_string(),
            "Container runtime is not installed (binary 'docker' not found on PATH)."
        );

        let timeout = TendrsError::ConvergenceTimeout {
            name: "web".into(),
            timeout_secs: 60,
        };
        assert_eq!(
            timeout.to_string(),
            "Container 'web' did not reach the running state within 60s."
        );
    }
}
