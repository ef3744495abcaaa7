//! Container lifecycle: list, create, start, stop, restart, remove, attach, exec.

use super::{EngineContext, Result, error_chain};
use crate::command::{CreateContainer, OperationRequest};
use crate::executor::{ExecutionResult, TerminalHandoff};
use crate::normalize::NormalizedTable;
use tracing::{info, warn};

pub struct ContainerManager<'a> {
    context: &'a EngineContext,
}

impl<'a> ContainerManager<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    /// All containers, running or not
    pub async fn list(&self) -> Result<NormalizedTable> {
        self.context.list(&OperationRequest::ListContainers).await
    }

    pub async fn create(&self, request: CreateContainer) -> Result<ExecutionResult> {
        let name = request.name.clone();
        let result = self
            .context
            .execute(&OperationRequest::CreateContainer(request))
            .await?;
        if result.success() {
            info!("Created container {}", name);
        }
        Ok(result)
    }

    pub async fn start(&self, name: &str) -> Result<ExecutionResult> {
        self.lifecycle(OperationRequest::StartContainer {
            name: name.to_string(),
        })
        .await
    }

    pub async fn stop(&self, name: &str) -> Result<ExecutionResult> {
        self.lifecycle(OperationRequest::StopContainer {
            name: name.to_string(),
        })
        .await
    }

    pub async fn restart(&self, name: &str) -> Result<ExecutionResult> {
        self.lifecycle(OperationRequest::RestartContainer {
            name: name.to_string(),
        })
        .await
    }

    /// Stop, then remove.
    ///
    /// Removal is attempted whatever the stop outcome; both executions are
    /// logged and the result of the removal is returned.
    pub async fn remove(&self, name: &str) -> Result<ExecutionResult> {
        match self.stop(name).await {
            Ok(stopped) if !stopped.success() => info!(
                "Stopping {} exited with code {}, removing anyway",
                name, stopped.exit_code
            ),
            Ok(_) => {}
            Err(e) => warn!(
                "Stopping {} could not run: {}, removing anyway",
                name,
                error_chain(&e)
            ),
        }

        self.lifecycle(OperationRequest::RemoveContainer {
            name: name.to_string(),
        })
        .await
    }

    /// Attach the terminal to a running container.
    pub async fn attach(&self, name: &str, terminal: &mut dyn TerminalHandoff) -> Result<()> {
        self.context
            .attach(
                &OperationRequest::AttachContainer {
                    name: name.to_string(),
                },
                terminal,
            )
            .await
    }

    /// Open an interactive command inside a container; an empty command opens
    /// the default shell.
    pub async fn exec(
        &self,
        name: &str,
        command: Vec<String>,
        terminal: &mut dyn TerminalHandoff,
    ) -> Result<()> {
        self.context
            .attach(
                &OperationRequest::ExecContainer {
                    name: name.to_string(),
                    command,
                },
                terminal,
            )
            .await
    }

    async fn lifecycle(&self, request: OperationRequest) -> Result<ExecutionResult> {
        let result = self.context.execute(&request).await?;
        if result.success() {
            info!("Applied {:?}", request);
        }
        Ok(result)
    }
}
