//! Images: list, pull, build, remove.

use super::{EngineContext, Result};
use crate::command::{ImageReference, OperationRequest};
use crate::executor::ExecutionResult;
use crate::normalize::NormalizedTable;
use std::path::Path;
use tracing::info;

pub struct ImageManager<'a> {
    context: &'a EngineContext,
}

impl<'a> ImageManager<'a> {
    pub fn new(context: &'a EngineContext) -> Self {
        Self { context }
    }

    pub async fn list(&self) -> Result<NormalizedTable> {
        self.context.list(&OperationRequest::ListImages).await
    }

    /// Pull a fully resolved `source/namespace/repo:tag` reference.
    pub async fn pull(&self, reference: &str) -> Result<ExecutionResult> {
        self.context
            .log()
            .add(format!("Attempting to pull {}", reference))
            .await;

        let result = self
            .context
            .execute(&OperationRequest::PullImage {
                reference: reference.to_string(),
            })
            .await?;
        if result.success() {
            info!("Pulled {}", reference);
        }
        Ok(result)
    }

    pub async fn pull_resolved(&self, reference: &ImageReference) -> Result<ExecutionResult> {
        self.pull(&reference.to_string()).await
    }

    /// Build `name:tag` from a context directory.
    pub async fn build(&self, context: &Path, name: &str, tag: &str) -> Result<ExecutionResult> {
        let result = self
            .context
            .execute(&OperationRequest::BuildImage {
                context: context.to_path_buf(),
                name: name.to_string(),
                tag: tag.to_string(),
            })
            .await?;
        if result.success() {
            info!("Built image {}:{}", name, tag);
        }
        Ok(result)
    }

    pub async fn remove(&self, id: &str) -> Result<ExecutionResult> {
        self.context
            .execute(&OperationRequest::RemoveImage { id: id.to_string() })
            .await
    }
}
