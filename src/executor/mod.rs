//! # Process Execution Layer
//!
//! Runs the external engine either with captured output (batch) or attached to
//! the controlling terminal (interactive), always starting from the full
//! process environment with the invocation's overlay applied on top.
//!
//! ## Core Components
//!
//! - **[`CommandExecutor`]**: Async trait implemented by every executor
//! - **[`HostExecutor`]**: Spawns processes on the host via `tokio::process::Command`
//! - **[`CommandInvocation`]**: Argument vector, environment overlay and optional timeout
//! - **[`ExecutionResult`]**: Exit code, captured stdout/stderr and the originating argv
//! - **[`TerminalHandoff`]**: Suspend/resume contract for interactive runs
//!
//! ## Failure Semantics
//!
//! A non-zero exit code is not an error. It is reported through
//! [`ExecutionResult::exit_code`] and every caller checks it explicitly. Only a
//! failure to start the process (or an expired timeout) is an [`ExecutorError`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use isopod::executor::{CommandExecutor, CommandInvocation, HostExecutor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let executor = HostExecutor::new();
//!
//!     let invocation = CommandInvocation::new("podman", vec!["ps".to_string(), "-a".to_string()])
//!         .with_env("XDG_RUNTIME_DIR", "/tmp/isopod/data/xdg");
//!
//!     let result = executor.run(&invocation).await?;
//!     if result.success() {
//!         println!("{}", result.stdout_text());
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Host-based process execution.
///
/// Implements [`HostExecutor`] using `tokio::process::Command`.
pub mod host;

/// Terminal handoff around interactive runs.
///
/// Defines [`TerminalHandoff`] and [`run_attached`], which brackets a blocking
/// interactive child with suspend/resume calls.
pub mod interactive;

pub use host::HostExecutor;
pub use interactive::{NoopTerminal, TerminalHandoff, run_attached};

/// Result of a captured process execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Argument vector that produced this result, program first
    pub argv: Vec<String>,
    /// Exit code (0 = success, -1 = terminated by a signal)
    pub exit_code: i32,
    /// Standard output (absent when attached to the terminal)
    pub stdout: Option<String>,
    /// Standard error (absent when attached to the terminal)
    pub stderr: Option<String>,
    /// Duration of command execution
    pub duration: Duration,
}

impl ExecutionResult {
    /// Check if the command executed successfully (exit code 0)
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Captured stdout, or an empty string
    pub fn stdout_text(&self) -> &str {
        self.stdout.as_deref().unwrap_or("")
    }

    /// Captured stderr, or an empty string
    pub fn stderr_text(&self) -> &str {
        self.stderr.as_deref().unwrap_or("")
    }
}

/// Command to execute: argument vector plus environment overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Program followed by its arguments
    pub argv: Vec<String>,
    /// Variables layered over the inherited environment (overlay wins)
    pub env: BTreeMap<String, String>,
    /// Working directory for command execution
    pub working_dir: Option<PathBuf>,
    /// Maximum execution time (None = no timeout)
    pub timeout: Option<Duration>,
}

impl CommandInvocation {
    /// Create a new invocation from a program and its arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(program.into());
        argv.extend(args);

        Self {
            argv,
            env: BTreeMap::new(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Program name or path
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }

    /// Arguments after the program
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// Add an environment variable to the overlay
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Set execution timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shell-quoted rendering of the argument vector, for logs
    pub fn display_argv(&self) -> String {
        display_argv(&self.argv)
    }
}

/// Render an argument vector as a copy-pasteable shell line.
pub fn display_argv(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| shell_escape::escape(arg.as_str().into()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Errors during command execution
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Invocation has no program to run
    #[error("Empty argument vector")]
    EmptyCommand,

    /// The process could not be started
    #[error("Failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Command execution timed out
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Terminal could not be handed over or back
    #[error("Terminal handoff failed")]
    Terminal(#[source] std::io::Error),

    /// I/O error
    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

/// Runs engine invocations.
///
/// Implementations must not depend on any presentation layer; interactive
/// runs are bracketed by [`run_attached`] instead.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run to completion with stdout and stderr captured.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be started or times out.
    /// A non-zero exit code is returned as data.
    async fn run(&self, invocation: &CommandInvocation) -> Result<ExecutionResult, ExecutorError>;

    /// Run with stdin/stdout/stderr attached to the controlling terminal.
    ///
    /// The caller must have suspended any UI drawing on the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    async fn run_interactive(&self, invocation: &CommandInvocation) -> Result<(), ExecutorError>;

    /// Executor type name for logging
    fn executor_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_program_and_args() {
        let invocation = CommandInvocation::new("podman", vec!["ps".to_string(), "-a".to_string()]);

        assert_eq!(invocation.program(), "podman");
        assert_eq!(invocation.args(), ["ps", "-a"]);
        assert_eq!(invocation.argv, vec!["podman", "ps", "-a"]);
    }

    #[test]
    fn test_env_overlay_keys_are_unique() {
        let invocation = CommandInvocation::new("podman", vec![])
            .with_env("XDG_RUNTIME_DIR", "/first")
            .with_env("XDG_RUNTIME_DIR", "/second");

        assert_eq!(invocation.env.len(), 1);
        assert_eq!(invocation.env["XDG_RUNTIME_DIR"], "/second");
    }

    #[test]
    fn test_display_argv_quotes_spaces() {
        let argv = vec![
            "podman".to_string(),
            "exec".to_string(),
            "web".to_string(),
            "echo hi".to_string(),
        ];
        assert_eq!(display_argv(&argv), "podman exec web 'echo hi'");
    }

    #[test]
    fn test_execution_result_text_accessors() {
        let result = ExecutionResult {
            argv: vec!["podman".to_string()],
            exit_code: 125,
            stdout: None,
            stderr: Some("no such container".to_string()),
            duration: Duration::ZERO,
        };

        assert!(!result.success());
        assert_eq!(result.stdout_text(), "");
        assert_eq!(result.stderr_text(), "no such container");
    }
}
