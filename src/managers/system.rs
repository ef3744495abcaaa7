//! Engine health: availability, crash recovery, security advisories.

use super::{EngineContext, Result};
use crate::command::OperationRequest;
use crate::runtime::{self, SecurityReport};
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of [`SystemManager::probe_and_recover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The engine answered
    Healthy,
    /// The engine failed and the stale run directory was reset
    Recovered,
    /// The engine failed and there is no isolated root to repair
    Failed { exit_code: i32 },
}

pub struct SystemManager<'a> {
    context: &'a EngineContext,
}

impl<'a> SystemManager<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    /// Resolved path of the engine program, if it can be found
    pub fn engine_path(&self) -> Option<PathBuf> {
        which::which(self.context.builder().program()).ok()
    }

    pub fn engine_available(&self) -> bool {
        self.engine_path().is_some()
    }

    /// Run `ps -a` against the root. A failure after a reboot or crash
    /// usually means stale runtime state, so the run directory is reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be started or the run directory
    /// cannot be reset.
    pub async fn probe_and_recover(&self) -> Result<ProbeOutcome> {
        let result = self.context.execute(&OperationRequest::ProbeEngine).await?;
        if result.success() {
            return Ok(ProbeOutcome::Healthy);
        }

        let Some(root) = self.context.builder().root() else {
            warn!("Engine probe failed with exit code {}", result.exit_code);
            return Ok(ProbeOutcome::Failed {
                exit_code: result.exit_code,
            });
        };

        self.context
            .log()
            .add(format!(
                "Error detected, cleaning up {}",
                root.run.display()
            ))
            .await;
        runtime::reset_run_dir(root)?;
        info!("Reset run directory of {}", root.base.display());

        Ok(ProbeOutcome::Recovered)
    }

    /// Startup check for an isolated root: probes and, if needed, resets
    /// stale runtime state left by a crash. Returns `None` without running
    /// anything when the engine uses its default storage.
    ///
    /// # Errors
    ///
    /// Same as [`probe_and_recover`](Self::probe_and_recover).
    pub async fn prepare_root(&self) -> Result<Option<ProbeOutcome>> {
        if self.context.builder().root().is_none() {
            return Ok(None);
        }
        self.probe_and_recover().await.map(Some)
    }

    /// Advisory permission and SELinux checks on the isolated root.
    ///
    /// Findings are logged as warnings and never stop the caller. Returns
    /// `None` when the engine uses its default storage.
    pub fn inspect_security(&self) -> Option<SecurityReport> {
        let root = self.context.builder().root()?;
        let report = runtime::inspect_root(root, self.context.expected_label());

        if !report.writable {
            warn!(
                "Isolated root {} is not fully readable, writable and searchable",
                root.base.display()
            );
        }
        if !report.mac_labelled {
            warn!(
                "Storage {} does not carry the {} label under enforcing SELinux",
                root.storage.display(),
                self.context.expected_label()
            );
        }

        Some(report)
    }
}
