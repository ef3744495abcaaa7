//! Pods: list, create, start, stop, remove.

use super::{EngineContext, Result};
use crate::command::OperationRequest;
use crate::executor::ExecutionResult;
use crate::normalize::NormalizedTable;

pub struct PodManager<'a> {
    context: &'a EngineContext,
}

impl<'a> PodManager<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    pub async fn list(&self) -> Result<NormalizedTable> {
        self.context.list(&OperationRequest::ListPods).await
    }

    /// Containers later joined to the pod inherit its network.
    pub async fn create(&self, name: &str, network: Option<&str>) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::CreatePod {
                name: name.to_string(),
                network: network.map(str::to_string),
            })
            .await
    }

    pub async fn start(&self, name: &str) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::StartPod {
                name: name.to_string(),
            })
            .await
    }

    pub async fn stop(&self, name: &str) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::StopPod {
                name: name.to_string(),
            })
            .await
    }

    pub async fn remove(&self, name: &str) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::RemovePod {
                name: name.to_string(),
            })
            .await
    }
}
