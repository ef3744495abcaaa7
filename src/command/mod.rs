//! Operation requests and their rendering into engine invocations.
//!
//! - [`request`]: the closed set of typed operations ([`OperationRequest`])
//! - [`builder`]: [`CommandBuilder`], an exhaustive mapping from request to
//!   argument vector and environment overlay
//!
//! ```rust
//! use isopod::command::{CommandBuilder, CreateContainer, OperationRequest};
//!
//! let request = OperationRequest::CreateContainer(
//!     CreateContainer::new("c1", "alpine").with_command("sh"),
//! );
//! let invocation = CommandBuilder::default().build(&request);
//! assert!(invocation.argv.ends_with(&[
//!     "-d".to_string(),
//!     "-i".to_string(),
//!     "-t".to_string(),
//!     "alpine".to_string(),
//!     "sh".to_string(),
//! ]));
//! ```

pub mod builder;
pub mod request;

pub use builder::{CommandBuilder, DEFAULT_EXEC_SHELL};
pub use request::{
    CreateContainer, EnvVar, ImageReference, OperationRequest, PortMapping, ResourceKind,
};
