//! Command construction.
//!
//! [`CommandBuilder::build`] is a pure function of the request and the
//! builder's settings: the same request always yields the same argument vector
//! and environment overlay.

use super::request::{CreateContainer, OperationRequest};
use crate::env::{self, XDG_RUNTIME_DIR_VAR};
use crate::executor::CommandInvocation;
use crate::runtime::RuntimeRoot;
use tracing::debug;

/// Shell opened by `exec` when no command is given
pub const DEFAULT_EXEC_SHELL: &str = "sh";

/// Renders [`OperationRequest`]s into engine invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    program: String,
    root: Option<RuntimeRoot>,
    mount_program: String,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(env::DEFAULT_ENGINE_PROGRAM)
    }
}

impl CommandBuilder {
    /// Builder for the engine's default (shared) storage.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            root: None,
            mount_program: env::DEFAULT_MOUNT_PROGRAM.to_string(),
        }
    }

    /// Target an isolated root. The root must already be provisioned.
    pub fn with_root(mut self, root: RuntimeRoot) -> Self {
        self.root = Some(root);
        self
    }

    /// Override the storage mount program used with isolated roots.
    pub fn with_mount_program(mut self, mount_program: impl Into<String>) -> Self {
        self.mount_program = mount_program.into();
        self
    }

    /// Engine program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Isolated root, if any
    pub fn root(&self) -> Option<&RuntimeRoot> {
        self.root.as_ref()
    }

    /// Render a request into an argument vector plus environment overlay.
    pub fn build(&self, request: &OperationRequest) -> CommandInvocation {
        let mut args = self.global_args();
        args.extend(Self::subcommand_args(request));

        let mut invocation = CommandInvocation::new(self.program.clone(), args);
        if let Some(ref root) = self.root {
            invocation = invocation.with_env(XDG_RUNTIME_DIR_VAR, path_arg(&root.xdg));
        }

        debug!("Built {} command: {}", request.kind(), invocation.display_argv());
        invocation
    }

    fn global_args(&self) -> Vec<String> {
        match self.root {
            Some(ref root) => vec![
                "--root".to_string(),
                path_arg(&root.storage),
                "--runroot".to_string(),
                path_arg(&root.run),
                "--tmpdir".to_string(),
                path_arg(&root.tmp),
                "--storage-opt".to_string(),
                format!("mount_program={}", self.mount_program),
            ],
            None => Vec::new(),
        }
    }

    fn subcommand_args(request: &OperationRequest) -> Vec<String> {
        use OperationRequest::*;

        match request {
            ListContainers => args(&["ps", "-a", "--format", "json"]),
            CreateContainer(create) => create_container_args(create),
            StartContainer { name } => args_with(&["start"], name),
            StopContainer { name } => args_with(&["stop"], name),
            RestartContainer { name } => args_with(&["restart"], name),
            RemoveContainer { name } => args_with(&["rm"], name),
            AttachContainer { name } => args_with(&["attach"], name),
            ExecContainer { name, command } => {
                let mut argv = args_with(&["exec", "-it"], name);
                if command.is_empty() {
                    argv.push(DEFAULT_EXEC_SHELL.to_string());
                } else {
                    argv.extend(command.iter().cloned());
                }
                argv
            }

            ListImages => args(&["images", "--format", "json"]),
            RemoveImage { id } => args_with(&["image", "rm"], id),
            PullImage { reference } => args_with(&["pull", "--quiet"], reference),
            BuildImage { context, name, tag } => {
                let mut argv = args(&["build", "--rm", "--no-cache", "-t"]);
                argv.push(format!("{}:{}", name, tag));
                argv.push(path_arg(context));
                argv
            }

            ListPods => args(&["pod", "ps", "--format", "json"]),
            CreatePod { name, network } => {
                let mut argv = args(&["pod", "create"]);
                if let Some(network) = present(network) {
                    argv.extend(["--network".to_string(), network.to_string()]);
                }
                argv.push(name.clone());
                argv
            }
            StartPod { name } => args_with(&["pod", "start"], name),
            StopPod { name } => args_with(&["pod", "stop"], name),
            RemovePod { name } => args_with(&["pod", "rm"], name),

            ListNetworks => args(&["network", "ls", "--format", "json"]),
            CreateNetwork { name, subnet } => {
                let mut argv = args(&["network", "create"]);
                if let Some(subnet) = present(subnet) {
                    argv.extend(["--subnet".to_string(), subnet.to_string()]);
                }
                argv.push(name.clone());
                argv
            }
            RemoveNetwork { name } => args_with(&["network", "rm"], name),

            ListVolumes => args(&["volume", "ls", "--format", "json"]),
            CreateVolume { name } => args_with(&["volume", "create"], name),
            RemoveVolume { name } => args_with(&["volume", "rm"], name),

            ProbeEngine => args(&["ps", "-a"]),
        }
    }
}

fn create_container_args(create: &CreateContainer) -> Vec<String> {
    // A container in a pod inherits the pod's network.
    let pod = present(&create.pod);
    let network = if pod.is_some() {
        None
    } else {
        present(&create.network)
    };

    let mut argv = args(&["run", "--name"]);
    argv.push(create.name.clone());

    if let Some(network) = network {
        argv.extend(["--network".to_string(), network.to_string()]);
    }
    if let Some(pod) = pod {
        argv.extend(["--pod".to_string(), pod.to_string()]);
    }
    if let (Some(volume), Some(mount_path)) = (present(&create.volume), present(&create.mount_path))
    {
        argv.extend(["-v".to_string(), format!("{}:{}", volume, mount_path)]);
    }

    for port in &create.ports {
        argv.extend(["-p".to_string(), format!("{}:{}", port.host, port.container)]);
    }
    for var in &create.env {
        argv.extend(["--env".to_string(), format!("{}={}", var.key, var.value)]);
    }

    if create.detached {
        argv.push("-d".to_string());
    }
    if create.interactive {
        argv.push("-i".to_string());
    }
    if create.tty {
        argv.push("-t".to_string());
    }

    argv.push(create.image.clone());

    if let Some(command) = present(&create.command) {
        argv.extend(command.split_whitespace().map(str::to_string));
    }

    argv
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

fn args_with(parts: &[&str], last: &str) -> Vec<String> {
    let mut argv = args(parts);
    argv.push(last.to_string());
    argv
}

fn path_arg(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CreateContainer;
    use std::path::PathBuf;

    fn build(request: OperationRequest) -> Vec<String> {
        CommandBuilder::default().build(&request).argv
    }

    #[test]
    fn test_shared_storage_has_no_global_flags() {
        let invocation = CommandBuilder::default().build(&OperationRequest::ListContainers);

        assert_eq!(invocation.argv, vec!["podman", "ps", "-a", "--format", "json"]);
        assert!(invocation.env.is_empty());
    }

    #[test]
    fn test_isolated_root_prefix_and_xdg_overlay() {
        let root = RuntimeRoot::at("/srv/pod-a");
        let builder = CommandBuilder::new("podman").with_root(root);

        let invocation = builder.build(&OperationRequest::ListImages);

        assert_eq!(
            invocation.argv,
            vec![
                "podman",
                "--root",
                "/srv/pod-a/data/storage",
                "--runroot",
                "/srv/pod-a/data/run",
                "--tmpdir",
                "/srv/pod-a/data/tmp",
                "--storage-opt",
                "mount_program=/usr/bin/fuse-overlayfs",
                "images",
                "--format",
                "json",
            ]
        );
        assert_eq!(invocation.env.len(), 1);
        assert_eq!(invocation.env["XDG_RUNTIME_DIR"], "/srv/pod-a/data/xdg");
        assert!(!invocation.argv.iter().any(|arg| arg.contains("XDG")));
    }

    #[test]
    fn test_custom_mount_program() {
        let builder = CommandBuilder::new("/opt/bin/podman")
            .with_root(RuntimeRoot::at("/srv/pod-b"))
            .with_mount_program("/usr/local/bin/fuse-overlayfs");

        let argv = builder.build(&OperationRequest::ProbeEngine).argv;

        assert_eq!(argv[0], "/opt/bin/podman");
        assert!(argv.contains(&"mount_program=/usr/local/bin/fuse-overlayfs".to_string()));
        assert_eq!(&argv[argv.len() - 2..], ["ps", "-a"]);
    }

    #[test]
    fn test_create_container_full_order() {
        let request = CreateContainer::new("c1", "alpine").with_command("sh");

        let argv = build(OperationRequest::CreateContainer(request));

        assert_eq!(
            argv,
            vec!["podman", "run", "--name", "c1", "-d", "-i", "-t", "alpine", "sh"]
        );
    }

    #[test]
    fn test_pod_takes_precedence_over_network() {
        let request = CreateContainer::new("c1", "alpine")
            .with_network("net1")
            .with_pod("pod1");

        let argv = build(OperationRequest::CreateContainer(request));

        let pod = argv.iter().position(|arg| arg == "--pod").unwrap();
        assert_eq!(argv[pod + 1], "pod1");
        assert!(!argv.contains(&"--network".to_string()));
        assert!(!argv.contains(&"net1".to_string()));
    }

    #[test]
    fn test_network_without_pod() {
        let request = CreateContainer::new("c1", "alpine").with_network("net1");

        let argv = build(OperationRequest::CreateContainer(request));

        let network = argv.iter().position(|arg| arg == "--network").unwrap();
        assert_eq!(argv[network + 1], "net1");
    }

    #[test]
    fn test_empty_pod_does_not_shadow_network() {
        let mut request = CreateContainer::new("c1", "alpine").with_network("net1");
        request.pod = Some(String::new());

        let argv = build(OperationRequest::CreateContainer(request));

        assert!(argv.contains(&"--network".to_string()));
        assert!(!argv.contains(&"--pod".to_string()));
    }

    #[test]
    fn test_volume_requires_mount_path() {
        let mut missing_path = CreateContainer::new("c1", "alpine");
        missing_path.volume = Some("data".to_string());
        missing_path.mount_path = Some(String::new());

        let mut missing_volume = CreateContainer::new("c1", "alpine");
        missing_volume.mount_path = Some("/data".to_string());

        for request in [missing_path, missing_volume] {
            let argv = build(OperationRequest::CreateContainer(request));
            assert!(!argv.contains(&"-v".to_string()));
            assert!(!argv.contains(&"--volume".to_string()));
        }
    }

    #[test]
    fn test_volume_mount() {
        let request = CreateContainer::new("c1", "alpine").with_volume("data", "/var/lib/data");

        let argv = build(OperationRequest::CreateContainer(request));

        let volume = argv.iter().position(|arg| arg == "-v").unwrap();
        assert_eq!(argv[volume + 1], "data:/var/lib/data");
    }

    #[test]
    fn test_flag_order_without_tty() {
        let request = CreateContainer::new("c1", "alpine").with_flags(true, true, false);

        let argv = build(OperationRequest::CreateContainer(request));

        assert_eq!(&argv[argv.len() - 3..], ["-d", "-i", "alpine"]);
        assert!(!argv.contains(&"-t".to_string()));
        assert!(!argv.contains(&"--tty".to_string()));
    }

    #[test]
    fn test_no_flags() {
        let request = CreateContainer::new("c1", "alpine").with_flags(false, false, false);

        let argv = build(OperationRequest::CreateContainer(request));

        assert_eq!(argv, vec!["podman", "run", "--name", "c1", "alpine"]);
    }

    #[test]
    fn test_ports_and_env_preserve_order() {
        let request = CreateContainer::new("web", "nginx")
            .with_port("8080", "80")
            .with_port("8443", "443")
            .with_env("B", "2")
            .with_env("A", "1")
            .with_flags(true, false, false);

        let argv = build(OperationRequest::CreateContainer(request));

        assert_eq!(
            argv,
            vec![
                "podman", "run", "--name", "web", "-p", "8080:80", "-p", "8443:443", "--env",
                "B=2", "--env", "A=1", "-d", "nginx",
            ]
        );
    }

    #[test]
    fn test_command_with_arguments() {
        let request = CreateContainer::new("c1", "alpine")
            .with_command("sleep 3600")
            .with_flags(true, false, false);

        let argv = build(OperationRequest::CreateContainer(request));

        assert_eq!(&argv[argv.len() - 3..], ["alpine", "sleep", "3600"]);
    }

    #[test]
    fn test_lifecycle_commands() {
        let name = || "web".to_string();

        assert_eq!(
            build(OperationRequest::StartContainer { name: name() }),
            vec!["podman", "start", "web"]
        );
        assert_eq!(
            build(OperationRequest::StopContainer { name: name() }),
            vec!["podman", "stop", "web"]
        );
        assert_eq!(
            build(OperationRequest::RestartContainer { name: name() }),
            vec!["podman", "restart", "web"]
        );
        assert_eq!(
            build(OperationRequest::RemoveContainer { name: name() }),
            vec!["podman", "rm", "web"]
        );
        assert_eq!(
            build(OperationRequest::AttachContainer { name: name() }),
            vec!["podman", "attach", "web"]
        );
    }

    #[test]
    fn test_exec_defaults_to_shell() {
        assert_eq!(
            build(OperationRequest::ExecContainer {
                name: "web".to_string(),
                command: vec![],
            }),
            vec!["podman", "exec", "-it", "web", "sh"]
        );
        assert_eq!(
            build(OperationRequest::ExecContainer {
                name: "web".to_string(),
                command: vec!["ls".to_string(), "-la".to_string()],
            }),
            vec!["podman", "exec", "-it", "web", "ls", "-la"]
        );
    }

    #[test]
    fn test_image_commands() {
        assert_eq!(
            build(OperationRequest::PullImage {
                reference: "docker.io/library/alpine:latest".to_string()
            }),
            vec!["podman", "pull", "--quiet", "docker.io/library/alpine:latest"]
        );
        assert_eq!(
            build(OperationRequest::RemoveImage {
                id: "0123456789ab".to_string()
            }),
            vec!["podman", "image", "rm", "0123456789ab"]
        );
        assert_eq!(
            build(OperationRequest::BuildImage {
                context: PathBuf::from("/src/app"),
                name: "app".to_string(),
                tag: "dev".to_string(),
            }),
            vec!["podman", "build", "--rm", "--no-cache", "-t", "app:dev", "/src/app"]
        );
    }

    #[test]
    fn test_pod_network_volume_commands() {
        assert_eq!(
            build(OperationRequest::CreatePod {
                name: "p1".to_string(),
                network: Some("net1".to_string()),
            }),
            vec!["podman", "pod", "create", "--network", "net1", "p1"]
        );
        assert_eq!(
            build(OperationRequest::CreatePod {
                name: "p1".to_string(),
                network: Some(String::new()),
            }),
            vec!["podman", "pod", "create", "p1"]
        );
        assert_eq!(
            build(OperationRequest::CreateNetwork {
                name: "net1".to_string(),
                subnet: Some("10.89.0.0/24".to_string()),
            }),
            vec!["podman", "network", "create", "--subnet", "10.89.0.0/24", "net1"]
        );
        assert_eq!(
            build(OperationRequest::RemoveNetwork {
                name: "net1".to_string()
            }),
            vec!["podman", "network", "rm", "net1"]
        );
        assert_eq!(
            build(OperationRequest::CreateVolume {
                name: "data".to_string()
            }),
            vec!["podman", "volume", "create", "data"]
        );
        assert_eq!(
            build(OperationRequest::ListVolumes),
            vec!["podman", "volume", "ls", "--format", "json"]
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = CommandBuilder::new("podman").with_root(RuntimeRoot::at("/srv/pod-c"));
        let request = OperationRequest::CreateContainer(
            CreateContainer::new("c1", "alpine")
                .with_env("A", "1")
                .with_port("1", "2"),
        );

        assert_eq!(builder.build(&request), builder.build(&request));
    }
}
