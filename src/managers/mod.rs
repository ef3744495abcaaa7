//! # Resource Managers
//!
//! One manager per resource kind, each exposing one async method per lifecycle
//! action. Every method runs the same pipeline, in this order:
//!
//! 1. build the invocation with the [`CommandBuilder`]
//! 2. run it through the [`CommandExecutor`]
//! 3. record the outcome in the [`OperationLog`]
//! 4. normalize listings into a [`NormalizedTable`]
//!
//! Managers borrow a shared [`EngineContext`], which carries the single log
//! instance of the process along with the builder, executor and normalizer.
//! A non-zero engine exit is returned as data; only a provisioning failure or a
//! process that cannot be started aborts an operation.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use isopod::command::CreateContainer;
//! use isopod::config::IsopodConfig;
//! use isopod::managers::EngineContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = EngineContext::from_config(&IsopodConfig::default()).await?;
//!
//! let request = CreateContainer::new("c1", "alpine").with_command("sh");
//! let result = context.containers().create(request).await?;
//! if result.success() {
//!     let table = context.containers().list().await?;
//!     println!("{} containers", table.len());
//! }
//! # Ok(())
//! # }
//! ```

use crate::command::{CommandBuilder, OperationRequest};
use crate::config::IsopodConfig;
use crate::executor::{
    CommandExecutor, ExecutionResult, ExecutorError, HostExecutor, TerminalHandoff, run_attached,
};
use crate::normalize::{NormalizedTable, Normalizer};
use crate::oplog::OperationLog;
use crate::runtime::{self, ProvisionError};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod container;
pub mod image;
pub mod network;
pub mod pod;
pub mod system;
pub mod volume;

pub use container::ContainerManager;
pub use image::ImageManager;
pub use network::NetworkManager;
pub use pod::PodManager;
pub use system::{ProbeOutcome, SystemManager};
pub use volume::VolumeManager;

/// Errors that abort a manager operation.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The isolated root could not be provisioned or repaired
    #[error("Provisioning failed")]
    Provision(#[from] ProvisionError),

    /// The engine process could not be run
    #[error("Execution failed")]
    Executor(#[from] ExecutorError),
}

/// Result type for manager operations.
pub type Result<T> = std::result::Result<T, ManagerError>;

/// An error and its causes on one line, outermost first.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Everything a manager needs to run one operation.
#[derive(Clone)]
pub struct EngineContext {
    builder: CommandBuilder,
    executor: Arc<dyn CommandExecutor>,
    log: OperationLog,
    normalizer: Normalizer,
    expected_label: String,
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("builder", &self.builder)
            .field("executor", &self.executor.executor_type())
            .field("normalizer", &self.normalizer)
            .finish()
    }
}

impl EngineContext {
    /// Assemble a context from its parts.
    pub fn new(
        builder: CommandBuilder,
        executor: Arc<dyn CommandExecutor>,
        log: OperationLog,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            builder,
            executor,
            log,
            normalizer,
            expected_label: crate::env::security::DEFAULT_EXPECTED_LABEL.to_string(),
        }
    }

    /// Build a host-backed context from configuration.
    ///
    /// The isolated root, when configured, is provisioned before anything
    /// runs. A persistent log that cannot be opened falls back to memory.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Provision`] when the root cannot be provisioned.
    pub async fn from_config(config: &IsopodConfig) -> Result<Self> {
        let mut builder = CommandBuilder::new(config.engine.program.clone())
            .with_mount_program(config.engine.mount_program.clone());

        if let Some(ref path) = config.root.path {
            let root = runtime::ensure_root(path)?;
            info!("Using isolated root at {}", root.base.display());
            builder = builder.with_root(root);
        }

        let log = match config.log.persistent_file() {
            Some(file) => match OperationLog::persistent(&file).await {
                Ok(log) => log,
                Err(e) => {
                    warn!(
                        "Cannot open operation log {}: {}, keeping it in memory",
                        file.display(),
                        e
                    );
                    OperationLog::new()
                }
            },
            None => OperationLog::new(),
        };

        Ok(Self::new(
            builder,
            Arc::new(HostExecutor::new()),
            log,
            config.normalizer.clone(),
        )
        .with_expected_label(config.security.expected_label.clone()))
    }

    /// SELinux type expected on isolated storage
    pub fn with_expected_label(mut self, label: impl Into<String>) -> Self {
        self.expected_label = label.into();
        self
    }

    pub fn builder(&self) -> &CommandBuilder {
        &self.builder
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn expected_label(&self) -> &str {
        &self.expected_label
    }

    pub fn containers(&self) -> ContainerManager<'_> {
        ContainerManager::new(self)
    }

    pub fn images(&self) -> ImageManager<'_> {
        ImageManager::new(self)
    }

    pub fn pods(&self) -> PodManager<'_> {
        PodManager::new(self)
    }

    pub fn networks(&self) -> NetworkManager<'_> {
        NetworkManager::new(self)
    }

    pub fn volumes(&self) -> VolumeManager<'_> {
        VolumeManager::new(self)
    }

    pub fn system(&self) -> SystemManager<'_> {
        SystemManager::new(self)
    }

    /// Build, run and record one captured execution.
    pub(crate) async fn execute(&self, request: &OperationRequest) -> Result<ExecutionResult> {
        let invocation = self.builder.build(request);
        debug!("Executing: {}", invocation.display_argv());

        match self.executor.run(&invocation).await {
            Ok(result) => {
                self.log.record(&result).await;
                if result.success() {
                    debug!("{} finished in {:?}", request.kind(), result.duration);
                } else {
                    warn!(
                        "Engine exited with code {}: {}",
                        result.exit_code,
                        result.stderr_text().trim()
                    );
                }
                Ok(result)
            }
            Err(e) => {
                self.log
                    .add(format!(
                        "Command could not be run: {}\nError: {}",
                        invocation.display_argv(),
                        error_chain(&e)
                    ))
                    .await;
                Err(e.into())
            }
        }
    }

    /// Run a listing request and normalize its output.
    pub(crate) async fn list(&self, request: &OperationRequest) -> Result<NormalizedTable> {
        debug_assert!(request.is_listing());
        let result = self.execute(request).await?;
        Ok(self.normalizer.normalize(request.kind(), &result))
    }

    /// Run an interactive request with the terminal handed to the child.
    pub(crate) async fn attach(
        &self,
        request: &OperationRequest,
        terminal: &mut dyn TerminalHandoff,
    ) -> Result<()> {
        debug_assert!(request.is_interactive());
        let invocation = self.builder.build(request);
        debug!("Attaching: {}", invocation.display_argv());

        match run_attached(self.executor.as_ref(), &invocation, terminal).await {
            Ok(()) => {
                self.log
                    .add(format!(
                        "Interactive session ended: {}",
                        invocation.display_argv()
                    ))
                    .await;
                Ok(())
            }
            Err(e) => {
                self.log
                    .add(format!(
                        "Interactive session failed: {}\nError: {}",
                        invocation.display_argv(),
                        error_chain(&e)
                    ))
                    .await;
                Err(e.into())
            }
        }
    }
}
