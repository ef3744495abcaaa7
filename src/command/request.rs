//! Typed operation requests.
//!
//! Every action the engine can be asked to perform is one variant of
//! [`OperationRequest`]. Requests are plain immutable values; turning them into
//! argument vectors is the builder's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of resource a request (or a listing) is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Container,
    Image,
    Pod,
    Network,
    Volume,
    System,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Container => "container",
            ResourceKind::Image => "image",
            ResourceKind::Pod => "pod",
            ResourceKind::Network => "network",
            ResourceKind::Volume => "volume",
            ResourceKind::System => "system",
        };
        f.write_str(name)
    }
}

/// `host:container` port publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub host: String,
    pub container: String,
}

impl PortMapping {
    pub fn new(host: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }
}

impl std::str::FromStr for PortMapping {
    type Err = String;

    /// Parse `HOST:CONTAINER`; the host side may itself contain an address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((host, container)) if !host.is_empty() && !container.is_empty() => {
                Ok(Self::new(host, container))
            }
            _ => Err(format!("expected HOST:CONTAINER, got '{}'", s)),
        }
    }
}

/// `key=value` environment variable passed into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::str::FromStr for EnvVar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self::new(key, value)),
            _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
        }
    }
}

/// Parameters of `podman run`.
///
/// Empty strings are treated the same as absent values, since they usually
/// come straight from blank input fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContainer {
    pub name: String,
    /// Resolved image reference, passed through untouched
    pub image: String,
    /// Ignored when `pod` is set: the container inherits the pod's network
    pub network: Option<String>,
    pub pod: Option<String>,
    /// Only mounted when `mount_path` is also set
    pub volume: Option<String>,
    pub mount_path: Option<String>,
    /// Start command, split on whitespace into trailing arguments
    pub command: Option<String>,
    pub detached: bool,
    pub interactive: bool,
    pub tty: bool,
    pub ports: Vec<PortMapping>,
    pub env: Vec<EnvVar>,
}

impl CreateContainer {
    /// Detached, interactive container with a TTY and nothing else set.
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            network: None,
            pod: None,
            volume: None,
            mount_path: None,
            command: None,
            detached: true,
            interactive: true,
            tty: true,
            ports: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn with_pod(mut self, pod: impl Into<String>) -> Self {
        self.pod = Some(pod.into());
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>, mount_path: impl Into<String>) -> Self {
        self.volume = Some(volume.into());
        self.mount_path = Some(mount_path.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_port(mut self, host: impl Into<String>, container: impl Into<String>) -> Self {
        self.ports.push(PortMapping::new(host, container));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(EnvVar::new(key, value));
        self
    }

    pub fn with_flags(mut self, detached: bool, interactive: bool, tty: bool) -> Self {
        self.detached = detached;
        self.interactive = interactive;
        self.tty = tty;
        self
    }
}

/// Image reference resolved against a registry: `source/namespace/repo:tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub source: String,
    pub namespace: String,
    pub repository: String,
    pub tag: String,
}

impl ImageReference {
    /// Default namespace for single-segment repositories
    pub const DEFAULT_NAMESPACE: &'static str = "library";

    /// Default tag when none is given
    pub const DEFAULT_TAG: &'static str = "latest";

    /// Resolve `repository` (`name` or `namespace/name`) on `source`.
    pub fn resolve(source: impl Into<String>, repository: &str, tag: Option<&str>) -> Self {
        let (namespace, repository) = repository
            .split_once('/')
            .unwrap_or((Self::DEFAULT_NAMESPACE, repository));

        Self {
            source: source.into(),
            namespace: namespace.to_string(),
            repository: repository.to_string(),
            tag: tag
                .filter(|t| !t.is_empty())
                .unwrap_or(Self::DEFAULT_TAG)
                .to_string(),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}:{}",
            self.source, self.namespace, self.repository, self.tag
        )
    }
}

/// Every operation the engine can be asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationRequest {
    ListContainers,
    CreateContainer(CreateContainer),
    StartContainer { name: String },
    StopContainer { name: String },
    RestartContainer { name: String },
    RemoveContainer { name: String },
    AttachContainer { name: String },
    /// Empty command opens the default shell
    ExecContainer { name: String, command: Vec<String> },

    ListImages,
    RemoveImage { id: String },
    PullImage { reference: String },
    BuildImage { context: PathBuf, name: String, tag: String },

    ListPods,
    CreatePod { name: String, network: Option<String> },
    StartPod { name: String },
    StopPod { name: String },
    RemovePod { name: String },

    ListNetworks,
    CreateNetwork { name: String, subnet: Option<String> },
    RemoveNetwork { name: String },

    ListVolumes,
    CreateVolume { name: String },
    RemoveVolume { name: String },

    /// `ps -a`, used to detect a root left inconsistent by a crash
    ProbeEngine,
}

impl OperationRequest {
    /// Resource kind this request targets
    pub fn kind(&self) -> ResourceKind {
        use OperationRequest::*;
        match self {
            ListContainers
            | CreateContainer(_)
            | StartContainer { .. }
            | StopContainer { .. }
            | RestartContainer { .. }
            | RemoveContainer { .. }
            | AttachContainer { .. }
            | ExecContainer { .. } => ResourceKind::Container,
            ListImages | RemoveImage { .. } | PullImage { .. } | BuildImage { .. } => {
                ResourceKind::Image
            }
            ListPods | CreatePod { .. } | StartPod { .. } | StopPod { .. } | RemovePod { .. } => {
                ResourceKind::Pod
            }
            ListNetworks | CreateNetwork { .. } | RemoveNetwork { .. } => ResourceKind::Network,
            ListVolumes | CreateVolume { .. } | RemoveVolume { .. } => ResourceKind::Volume,
            ProbeEngine => ResourceKind::System,
        }
    }

    /// True for requests that take over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            OperationRequest::AttachContainer { .. } | OperationRequest::ExecContainer { .. }
        )
    }

    /// True for requests whose output is a JSON listing
    pub fn is_listing(&self) -> bool {
        use OperationRequest::*;
        matches!(
            self,
            ListContainers | ListImages | ListPods | ListNetworks | ListVolumes
        )
    }
}
