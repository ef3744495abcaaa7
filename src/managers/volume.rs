//! Volumes: list, create, remove.

use super::{EngineContext, Result};
use crate::command::OperationRequest;
use crate::executor::ExecutionResult;
use crate::normalize::NormalizedTable;

pub struct VolumeManager<'a> {
    context: &'a EngineContext,
}

impl<'a> VolumeManager<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    pub async fn list(&self) -> Result<NormalizedTable> {
        self.context.list(&OperationRequest::ListVolumes).await
    }

    pub async fn create(&self, name: &str) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::CreateVolume {
                name: name.to_string(),
            })
            .await
    }

    pub async fn remove(&self, name: &str) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::RemoveVolume {
                name: name.to_string(),
            })
            .await
    }
}
