//! # TendRS Configuration System
//!
//! File: cli/src/core/config.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module implements the configuration system for TendRS, handling loading,
//! merging, validation, and access to configuration data. It supports a multi-level
//! configuration approach that combines defaults, user settings, and project-specific
//! overrides.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Configuration is loaded from multiple sources in order of precedence
//! - Paths are validated and expanded (e.g., `~` to home directory)
//! - Configuration is validated for correctness before use
//! - Structured data models ensure type safety
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.tendrs.toml` in current directory or ancestors
//! 2. User-specific `~/.config/tendrs/config.toml`
//! 3. Default values defined in the code
//!
//! The loaded `Config` is the single source of the configured container
//! registry and the daemon-launch command. Both are passed explicitly into
//! the orchestrator at construction; nothing reads configuration through
//! ambient global state.
//!
//! ## Examples
//!
//! Loading and using configuration:
//!
//! ```rust
//! let cfg = config::load_config()?;
//!
//! // The configured container registry
//! let names = &cfg.orchestrator.containers;
//!
//! // Daemon settings
//! let binary = &cfg.daemon.binary;
//! let launch = &cfg.daemon.start_command;
//! ```
//!
//! The configuration is loaded once per command execution and passed
//! to the modules that need it.
//!
use crate::core::error::{Result, TendrsError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
}

/// Configuration for the reconciliation engine (`tendrs start` / `tendrs stop`).
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Names of the containers this orchestrator is responsible for.
    /// Immutable for the process lifetime once loaded.
    #[serde(default)]
    pub containers: Vec<String>,
    /// Interval between readiness-poll iterations, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Deadline for a container to report "running" after a start command,
    /// in seconds. Expiry surfaces as a convergence error instead of hanging.
    #[serde(default = "default_readiness_timeout_secs")]
    pub readiness_timeout_secs: u64,
    /// Grace period handed to the runtime's stop command before it kills the
    /// container, in seconds.
    #[serde(default = "default_stop_timeout_secs")]
    pub stop_timeout_secs: u64,
}

/// Configuration for locating and bootstrapping the container runtime daemon.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// Name of the container runtime binary looked up on the search path.
    #[serde(default = "default_daemon_binary")]
    pub binary: String,
    /// Platform command used to launch the daemon when it is installed but
    /// not running (argv form, program first).
    #[serde(default = "default_daemon_start_command")]
    pub start_command: Vec<String>,
}

/// Configuration for the compose manifest used by `tendrs container pull`.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ComposeConfig {
    /// Path to the compose manifest (can use ~). Will be expanded.
    #[serde(default = "default_compose_file")]
    pub file: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            containers: Vec::new(),
            poll_interval_ms: default_poll_interval_ms(),
            readiness_timeout_secs: default_readiness_timeout_secs(),
            stop_timeout_secs: default_stop_timeout_secs(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            binary: default_daemon_binary(),
            start_command: default_daemon_start_command(),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            file: default_compose_file(),
        }
    }
}

impl OrchestratorConfig {
    /// Poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Readiness deadline as a `Duration`.
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }
}

impl Config {
    /// Stop grace period in seconds, as the runtime's `-t` argument.
    pub fn stop_timeout_arg(&self) -> String {
        self.orchestrator.stop_timeout_secs.to_string()
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}
fn default_readiness_timeout_secs() -> u64 {
    60
}
fn default_stop_timeout_secs() -> u64 {
    10
}
fn default_daemon_binary() -> String {
    "docker".to_string()
}
fn default_daemon_start_command() -> Vec<String> {
    // The daemon is launched differently per platform; macOS ships it inside
    // the Docker Desktop application bundle.
    if cfg!(target_os = "macos") {
        vec!["open".into(), "-a".into(), "Docker".into()]
    } else {
        vec!["systemctl".into(), "start".into(), "docker".into()]
    }
}
fn default_compose_file() -> String {
    "docker-compose.yml".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".tendrs.toml";

/// Loads the final configuration by merging user and project files over defaults.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "TendRS", "tendrs") {
        let config_dir = proj_dirs.config_dir();
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    if let Some(project_config_path) = find_project_config_path()? {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file (.tendrs.toml) found in current directory or ancestors."
        );
        Ok(None)
    }
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        let git_dir = path.join(".git");
        if project_config.exists() && project_config.is_file() {
            return Ok(Some(project_config));
        }
        if git_dir.exists() && git_dir.is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }
    Ok(None)
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.orchestrator.containers = if !project_cfg.orchestrator.containers.is_empty() {
        project_cfg.orchestrator.containers
    } else {
        user.orchestrator.containers
    };
    merged.orchestrator.poll_interval_ms =
        if project_cfg.orchestrator.poll_interval_ms != default_poll_interval_ms() {
            project_cfg.orchestrator.poll_interval_ms
        } else {
            user.orchestrator.poll_interval_ms
        };
    merged.orchestrator.readiness_timeout_secs =
        if project_cfg.orchestrator.readiness_timeout_secs != default_readiness_timeout_secs() {
            project_cfg.orchestrator.readiness_timeout_secs
        } else {
            user.orchestrator.readiness_timeout_secs
        };
    merged.orchestrator.stop_timeout_secs =
        if project_cfg.orchestrator.stop_timeout_secs != default_stop_timeout_secs() {
            project_cfg.orchestrator.stop_timeout_secs
        } else {
            user.orchestrator.stop_timeout_secs
        };
    merged.daemon.binary = if project_cfg.daemon.binary != default_daemon_binary() {
        project_cfg.daemon.binary
    } else {
        user.daemon.binary
    };
    merged.daemon.start_command =
        if project_cfg.daemon.start_command != default_daemon_start_command() {
            project_cfg.daemon.start_command
        } else {
            user.daemon.start_command
        };
    merged.compose.file = if project_cfg.compose.file != default_compose_file() {
        project_cfg.compose.file
    } else {
        user.compose.file
    };
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    debug!("Expanding paths in configuration...");
    config.compose.file = shellexpand::tilde(&config.compose.file).into_owned();
    debug!("Expanded compose file path: {}", config.compose.file);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.daemon.binary.is_empty() {
        return Err(anyhow!(TendrsError::Config(
            "Daemon binary name cannot be empty.".to_string()
        )));
    }
    if config.daemon.start_command.is_empty() {
        return Err(anyhow!(TendrsError::Config(
            "Daemon start command cannot be empty.".to_string()
        )));
    }
    if config.orchestrator.poll_interval_ms == 0 {
        return Err(anyhow!(TendrsError::Config(
            "Poll interval must be greater than zero.".to_string()
        )));
    }
    for name in &config.orchestrator.containers {
        if name.trim().is_empty() {
            return Err(anyhow!(TendrsError::Config(
                "Configured container names cannot be empty.".to_string()
            )));
        }
    }
    if config.orchestrator.containers.is_empty() {
        // An empty registry is legal; reconcile calls will warn and no-op.
        warn!("No containers configured; start/stop will have nothing to do.");
    }
    info!("Configuration validation successful.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [orchestrator]
            containers = ["web", "db"]
            readiness_timeout_secs = 30

            [daemon]
            binary = "podman"
            start_command = ["systemctl", "start", "podman"]

            [compose]
            file = "~/stacks/docker-compose.yml"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.orchestrator.containers, vec!["web", "db"]);
        assert_eq!(config.orchestrator.readiness_timeout_secs, 30);
        assert_eq!(
            config.orchestrator.poll_interval_ms,
            default_poll_interval_ms()
        ); // Default
        assert_eq!(config.daemon.binary, "podman");
        assert_eq!(
            config.daemon.start_command,
            vec!["systemctl", "start", "podman"]
        );
        assert_eq!(config.compose.file, "~/stacks/docker-compose.yml"); // Not yet expanded
    }

    #[test]
    fn test_defaults_when_sections_absent() {
        let config: Config = toml::from_str("").expect("Empty TOML should parse");
        assert!(config.orchestrator.containers.is_empty());
        assert_eq!(config.daemon.binary, "docker");
        assert_eq!(config.orchestrator.poll_interval_ms, 100);
        assert_eq!(config.orchestrator.readiness_timeout_secs, 60);
        assert_eq!(config.compose.file, "docker-compose.yml");
    }

    #[test]
    fn test_merge_project_overrides_user() {
        let user: Config = toml::from_str(
            r#"
            [orchestrator]
            containers = ["user-a"]
            [daemon]
            binary = "podman"
        "#,
        )
        .unwrap();
        let project: Config = toml::from_str(
            r#"
            [orchestrator]
            containers = ["proj-a", "proj-b"]
        "#,
        )
        .unwrap();

        let merged = merge_configs(user, Some(project));
        // Project list wins where set.
        assert_eq!(merged.orchestrator.containers, vec!["proj-a", "proj-b"]);
        // User value survives where project kept the default.
        assert_eq!(merged.daemon.binary, "podman");
    }

    #[test]
    fn test_merge_without_project_keeps_user() {
        let user: Config = toml::from_str(
            r#"
            [orchestrator]
            containers = ["solo"]
        "#,
        )
        .unwrap();
        let merged = merge_configs(user, None);
        assert_eq!(merged.orchestrator.containers, vec!["solo"]);
    }

    #[test]
    fn test_validate_rejects_empty_daemon_binary() {
        let mut config = Config::default();
        config.daemon.binary = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = Config::default();
        config.orchestrator.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_accepts_empty_registry() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config::default();
        config.compose.file = "~/stacks/compose.yml".to_string();
        expand_config_paths(&mut config).unwrap();
        assert!(
            !config.compose.file.starts_with('~'),
            "tilde should be expanded, got {}",
            config.compose.file
        );
    }

    #[test]
    fn test_deny_unknown_fields() {
        let toml_content = r#"
            [orchestrator]
            containerz = ["typo"]
        "#;
        let parsed: std::result::Result<Config, _> = toml::from_str(toml_content);
        assert!(parsed.is_err(), "Unknown fields should be rejected");
    }
}
