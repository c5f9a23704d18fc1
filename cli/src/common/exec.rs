//! # TendRS Process Execution Utilities (`common::exec`)
//!
//! File: cli/src/common/exec.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! This module provides the command executor every other component is built
//! on: a thin, capture-everything wrapper around `tokio::process::Command`.
//! Running the container runtime binary, launching the daemon, and invoking
//! the compose tool all go through here.
//!
//! ## Architecture
//!
//! - **`CommandOutput`**: the full result of one external invocation:
//!   captured stdout/stderr, exit code, a success flag, a spawn-error field,
//!   and the wall-clock duration.
//! - **`CommandRunner`**: the trait seam. Components hold an
//!   `Arc<dyn CommandRunner>` so tests can substitute a scripted fake and
//!   assert on the exact command lines issued.
//! - **`Executor`**: the production implementation. Supports a silent
//!   variant (captures output without echoing it to the terminal) and an
//!   elevated variant (prefixes `sudo`) for package-manager style callers.
//!
//! A failed *spawn* (binary missing, permission denied) is not an `Err`:
//! it is reported inside `CommandOutput` with `success = false` and the
//! `error` field set. Callers decide whether a failed command is fatal;
//! the executor never does.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::exec::{argv, CommandRunner, Executor};
//!
//! # async fn run_example() {
//! let runner = Executor::silent();
//! let out = runner.run("docker", &argv(&["ps", "-q"])).await;
//! if out.success {
//!     println!("{} containers listed", out.output.lines().count());
//! }
//! # }
//! ```
//!
use futures_util::future::BoxFuture;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of a single external command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Captured standard output, lossily decoded as UTF-8.
    pub output: String,
    /// Captured standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Process exit code; `-1` when the process was killed by a signal or
    /// never spawned.
    pub exit_code: i32,
    /// True when the process spawned and exited with status zero.
    pub success: bool,
    /// Spawn-level failure (e.g. binary not found). Absent when the process
    /// actually ran, even if it exited non-zero.
    pub error: Option<String>,
    /// Wall-clock time spent waiting for the process.
    pub duration: Duration,
}

impl CommandOutput {
    /// A successful invocation with the given stdout. Handy for tests.
    pub fn ok(stdout: &str) -> Self {
        Self {
            output: stdout.to_string(),
            stderr: String::new(),
            exit_code: 0,
            success: true,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// A completed-but-failed invocation with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: &str) -> Self {
        Self {
            output: String::new(),
            stderr: stderr.to_string(),
            exit_code,
            success: false,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// An invocation that never spawned (binary missing, permissions, ...).
    pub fn spawn_failed(message: &str) -> Self {
        Self {
            output: String::new(),
            stderr: String::new(),
            exit_code: -1,
            success: false,
            error: Some(message.to_string()),
            duration: Duration::ZERO,
        }
    }

    /// Best human-readable failure detail: spawn error, stderr, then stdout.
    pub fn detail(&self) -> String {
        if let Some(err) = &self.error {
            return err.clone();
        }
        if !self.stderr.trim().is_empty() {
            return self.stderr.trim().to_string();
        }
        self.output.trim().to_string()
    }
}

/// The seam between the orchestrator and the operating system.
///
/// Implemented by [`Executor`] in production and by scripted fakes in tests.
/// The returned future owns its data so it can be freely spawned onto tasks.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, capturing all output. Never returns an
    /// error: failures are reported inside the [`CommandOutput`].
    fn run(&self, program: &str, args: &[String]) -> BoxFuture<'static, CommandOutput>;
}

/// Convenience: build an owned argv from string literals.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

/// Production [`CommandRunner`] backed by `tokio::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    silent: bool,
    elevate: bool,
}

impl Executor {
    /// Executor that echoes captured output to the terminal after the
    /// process exits.
    pub fn new() -> Self {
        Self {
            silent: false,
            elevate: false,
        }
    }

    /// Executor that captures output without echoing anything.
    pub fn silent() -> Self {
        Self {
            silent: true,
            elevate: false,
        }
    }

    /// Executor that runs commands through `sudo`.
    ///
    /// Used by callers that drive the system package manager; the
    /// orchestrator core itself never elevates.
    pub fn elevated() -> Self {
        Self {
            silent: false,
            elevate: true,
        }
    }
}

impl CommandRunner for Executor {
    fn run(&self, program: &str, args: &[String]) -> BoxFuture<'static, CommandOutput> {
        let program = program.to_string();
        let args = args.to_vec();
        let silent = self.silent;
        let elevate = self.elevate;
        Box::pin(async move { execute(program, args, silent, elevate).await })
    }
}

/// Spawn the process, wait for it, and collect everything into a
/// [`CommandOutput`]. Stdin is closed so child processes cannot block on
/// interactive input.
async fn execute(program: String, args: Vec<String>, silent: bool, elevate: bool) -> CommandOutput {
    let (effective_program, effective_args) = if elevate {
        let mut sudo_args = Vec::with_capacity(args.len() + 1);
        sudo_args.push(program.clone());
        sudo_args.extend(args.iter().cloned());
        ("sudo".to_string(), sudo_args)
    } else {
        (program.clone(), args.clone())
    };

    debug!(
        "Executing: {} {}",
        effective_program,
        effective_args.join(" ")
    );

    let started = Instant::now();
    let result = Command::new(&effective_program)
        .args(&effective_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;
    let duration = started.elapsed();

    match result {
        Ok(out) => {
            let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
            let exit_code = out.status.code().unwrap_or(-1);
            let success = out.status.success();
            if !silent {
                if !stdout.is_empty() {
                    print!("{stdout}");
                }
                if !stderr.is_empty() {
                    eprint!("{stderr}");
                }
            }
            debug!(
                "Command '{}' finished: exit {} in {:?}",
                program, exit_code, duration
            );
            CommandOutput {
                output: stdout,
                stderr,
                exit_code,
                success,
                error: None,
                duration,
            }
        }
        Err(e) => {
            warn!("Failed to spawn '{}': {}", program, e);
            let mut out = CommandOutput::spawn_failed(&e.to_string());
            out.duration = duration;
            out
        }
    }
}

// --- Test Support ---
// A scripted CommandRunner shared by the unit tests of the docker modules.
// Lives here (cfg(test)) so every #[cfg(test)] module in the crate can use it.
#[cfg(test)]
pub(crate) mod testing {
    use super::{CommandOutput, CommandRunner};
    use futures_util::future::BoxFuture;
    use std::sync::Mutex;

    type Script = Box<dyn Fn(&str, &[String]) -> CommandOutput + Send + Sync>;

    /// A `CommandRunner` that answers from a closure and records every
    /// command line it was asked to run.
    pub struct ScriptedRunner {
        script: Script,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedRunner {
        pub fn new(
            script: impl Fn(&str, &[String]) -> CommandOutput + Send + Sync + 'static,
        ) -> Self {
            Self {
                script: Box::new(script),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Every recorded invocation, program first.
        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        /// Number of recorded invocations whose argv starts with `prefix`.
        pub fn count_matching(&self, prefix: &[&str]) -> usize {
            self.calls()
                .iter()
                .filter(|argv| {
                    argv.len() >= prefix.len()
                        && argv.iter().zip(prefix.iter()).all(|(a, p)| a == p)
                })
                .count()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, program: &str, args: &[String]) -> BoxFuture<'static, CommandOutput> {
            let mut argv = vec![program.to_string()];
            argv.extend(args.iter().cloned());
            self.calls.lock().unwrap().push(argv);
            let out = (self.script)(program, args);
            Box::pin(async move { out })
        }
    }
}
