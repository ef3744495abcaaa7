//! # isopod
//!
//! A control layer for the podman container engine that keeps each engine
//! instance in its own self-contained runtime root, translates typed operation
//! requests into engine invocations and turns the engine's JSON listings back
//! into display-ready tables.
//!
//! ## Architecture Overview
//!
//! Leaves first:
//!
//! - **[`runtime`]**: Provisioning of `<root>/data/{storage,run,tmp,xdg}` plus
//!   advisory permission and SELinux checks
//! - **[`executor`]**: Captured and terminal-attached process execution
//! - **[`command`]**: Typed [`OperationRequest`]s and the pure [`CommandBuilder`]
//! - **[`normalize`]**: Per-resource parsers producing [`NormalizedTable`]s
//! - **[`oplog`]**: The append-only [`OperationLog`] shared by every manager
//! - **[`managers`]**: Container, image, pod, network, volume and system
//!   managers composing all of the above through an [`EngineContext`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use isopod::{EngineContext, IsopodConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = IsopodConfig::default();
//!     config.root.path = Some("/srv/pods/alpha".into());
//!
//!     let context = EngineContext::from_config(&config).await?;
//!     context.system().probe_and_recover().await?;
//!
//!     let images = context.images().list().await?;
//!     for row in images.data_rows() {
//!         println!("{}", row.join("  "));
//!     }
//!
//!     for entry in context.log().read().await {
//!         println!("{}", entry);
//!     }
//!     Ok(())
//! }
//! ```

/// Environment constants and path utilities.
///
/// Centralizes program names, file names and the isolated-root layout.
pub mod env;

/// Isolated runtime roots.
///
/// Idempotent provisioning, crash cleanup and advisory security inspection.
pub mod runtime;

/// Process execution layer.
pub mod executor;

/// Operation requests and command construction.
pub mod command;

/// Engine output normalization.
pub mod normalize;

/// Shared, append-only operation log.
pub mod oplog;

/// Resource managers and the engine context they share.
pub mod managers;

/// Configuration file model.
pub mod config;

// CLI module for command-line interface
pub mod cli;

pub use command::{CommandBuilder, CreateContainer, ImageReference, OperationRequest, ResourceKind};
pub use config::IsopodConfig;
pub use executor::{CommandExecutor, CommandInvocation, ExecutionResult, HostExecutor};
pub use managers::{EngineContext, ManagerError};
pub use normalize::{NormalizedTable, Normalizer};
pub use oplog::{LogEntry, OperationLog};
pub use runtime::{RuntimeRoot, ensure_root};
