//! # TendRS Main Entry Point
//!
//! File: cli/src/main.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Entry point for the TendRS CLI, a small orchestrator that keeps a
//! configured set of local containers running. This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`start`, `stop`, `status`, `container`) is a
//!   variant in the `Commands` enum, mapped to a handler in `commands::*`.
//! - All errors are propagated to this level for consistent handling.
//!
//! ## Examples
//!
//! ```bash
//! # Bring the configured containers up and wait for readiness
//! tendrs start
//!
//! # Same, with debug logging
//! tendrs -vv start
//!
//! # Ad-hoc operations outside the configured set
//! tendrs container stop web db
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (start, stop, status, container).
mod common; // Shared utilities (exec, docker, compose).
mod core; // Core infrastructure (errors, config).

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "tendrs",
    about = "TendRS: keep a configured set of local containers running",
    long_about = "Reconciles a configured set of containers against live daemon state:\n\
                  starts what is down, waits for readiness, and stops cleanly.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Start all configured containers and wait for readiness.
    Start(commands::start::StartArgs),
    /// Stop all configured containers.
    Stop(commands::stop::StopArgs),
    /// Show daemon availability and configured container states.
    Status(commands::status::StatusArgs),
    /// Ad-hoc operations on explicitly named containers.
    #[command(alias = "c")]
    Container(commands::container::ContainerArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Start(args) => commands::start::handle_start(args).await,
        Commands::Stop(args) => commands::stop::handle_stop(args).await,
        Commands::Status(args) => commands::status::handle_status(args).await,
        Commands::Container(args) => commands::container::handle_container(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

// --- Basic Integration Tests ---
#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    fn tendrs_cmd() -> Command {
        Command::cargo_bin("tendrs").expect("Failed to find tendrs binary for testing")
    }
    #[test]
    fn test_main_help_flag() {
        tendrs_cmd().arg("--help").assert().success();
    }
    #[test]
    fn test_main_version_flag() {
        tendrs_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
