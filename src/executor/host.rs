//! Native host process execution.
//!
//! Executes engine commands directly on the host using `tokio::process::Command`.
//! The child inherits the full environment of this process; the invocation's
//! overlay is applied on top, so overlay keys win on conflict.

use super::{CommandExecutor, CommandInvocation, ExecutionResult, ExecutorError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Executes commands directly on the host system
#[derive(Debug, Clone)]
pub struct HostExecutor;

impl HostExecutor {
    /// Create a new host executor
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &CommandInvocation) -> Result<Command, ExecutorError> {
        if invocation.argv.is_empty() {
            return Err(ExecutorError::EmptyCommand);
        }

        let mut command = Command::new(invocation.program());
        command.args(invocation.args());
        command.envs(&invocation.env);

        if let Some(ref dir) = invocation.working_dir {
            command.current_dir(dir);
        }

        Ok(command)
    }

    fn spawn_error(invocation: &CommandInvocation, source: std::io::Error) -> ExecutorError {
        ExecutorError::Spawn {
            program: invocation.program().to_string(),
            source,
        }
    }
}

impl Default for HostExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for HostExecutor {
    async fn run(&self, invocation: &CommandInvocation) -> Result<ExecutionResult, ExecutorError> {
        debug!("Executing on host: {}", invocation.display_argv());

        let start = Instant::now();

        let mut command = Self::command(invocation)?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = if let Some(timeout) = invocation.timeout {
            match tokio::time::timeout(timeout, command.output()).await {
                Ok(result) => result.map_err(|e| Self::spawn_error(invocation, e))?,
                Err(_) => {
                    return Err(ExecutorError::Timeout(timeout));
                }
            }
        } else {
            command
                .output()
                .await
                .map_err(|e| Self::spawn_error(invocation, e))?
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);
        debug!("Exited with {} after {:?}", exit_code, duration);

        Ok(ExecutionResult {
            argv: invocation.argv.clone(),
            exit_code,
            stdout: Some(String::from_utf8_lossy(&output.stdout).to_string()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
            duration,
        })
    }

    async fn run_interactive(&self, invocation: &CommandInvocation) -> Result<(), ExecutorError> {
        debug!("Attaching terminal to: {}", invocation.display_argv());

        let mut command = Self::command(invocation)?;
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = command
            .status()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;

        debug!("Interactive session ended with {:?}", status.code());
        Ok(())
    }

    fn executor_type(&self) -> &'static str {
        "host"
    }
}
