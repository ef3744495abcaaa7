//! Networks: list, create, remove.

use super::{EngineContext, Result};
use crate::command::OperationRequest;
use crate::executor::ExecutionResult;
use crate::normalize::NormalizedTable;

pub struct NetworkManager<'a> {
    context: &'a EngineContext,
}

impl<'a> NetworkManager<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    pub async fn list(&self) -> Result<NormalizedTable> {
        self.context.list(&OperationRequest::ListNetworks).await
    }

    pub async fn create(&self, name: &str, subnet: Option<&str>) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::CreateNetwork {
                name: name.to_string(),
                subnet: subnet.map(str::to_string),
            })
            .await
    }

    pub async fn remove(&self, name: &str) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::RemoveNetwork {
                name: name.to_string(),
            })
            .await
    }
}
