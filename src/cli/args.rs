//! Command line argument parsing
//!
//! Global options select the configuration file, the isolated root and the
//! engine program. Subcommands map one-to-one onto resource manager actions:
//! - `container`, `image`, `pod`, `network`, `volume`: lifecycle actions
//! - `log`: show or clear the operation log
//! - `system`: engine availability, crash recovery and security checks
//! - `show-config`: show configuration discovery information

use crate::command::{CreateContainer, EnvVar, ImageReference, PortMapping};
use crate::config::IsopodConfig;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "isopod")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drive podman against isolated, self-contained runtime roots")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file (skips discovery)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Isolated root directory for engine storage and state
    #[arg(short = 'r', long = "root", global = true)]
    pub root: Option<PathBuf>,

    /// Engine program
    #[arg(long = "engine", global = true)]
    pub engine: Option<String>,

    /// Debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage containers
    #[command(subcommand)]
    Container(ContainerCommand),

    /// Manage images
    #[command(subcommand)]
    Image(ImageCommand),

    /// Manage pods
    #[command(subcommand)]
    Pod(PodCommand),

    /// Manage networks
    #[command(subcommand)]
    Network(NetworkCommand),

    /// Manage volumes
    #[command(subcommand)]
    Volume(VolumeCommand),

    /// Show or clear the operation log
    #[command(subcommand)]
    Log(LogCommand),

    /// Engine health and root checks
    #[command(subcommand)]
    System(SystemCommand),

    /// Show configuration discovery information
    ShowConfig {
        /// Write a default ~/.isopod/config.toml if none exists
        #[arg(long = "init")]
        init: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ContainerCommand {
    /// List all containers
    #[command(alias = "ls")]
    List,
    /// Create and start a container
    Create(CreateArgs),
    Start { name: String },
    Stop { name: String },
    Restart { name: String },
    /// Stop and remove a container
    #[command(alias = "rm")]
    Remove { name: String },
    /// Attach the terminal to a running container
    Attach { name: String },
    /// Run an interactive command (default: shell) in a container
    Exec {
        name: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[derive(Debug, ClapArgs)]
pub struct CreateArgs {
    /// Container name
    pub name: String,
    /// Image reference
    pub image: String,
    /// Network to join (ignored with --pod)
    #[arg(long)]
    pub network: Option<String>,
    /// Pod to join
    #[arg(long)]
    pub pod: Option<String>,
    /// Volume to mount (requires --mount-path)
    #[arg(long)]
    pub volume: Option<String>,
    /// Mount path inside the container (requires --volume)
    #[arg(long = "mount-path")]
    pub mount_path: Option<String>,
    /// Start command
    #[arg(long)]
    pub command: Option<String>,
    /// Published port, HOST:CONTAINER
    #[arg(short = 'p', long = "publish")]
    pub ports: Vec<PortMapping>,
    /// Environment variable, KEY=VALUE
    #[arg(short = 'e', long = "env")]
    pub env: Vec<EnvVar>,
    /// Run in the foreground
    #[arg(long = "no-detach")]
    pub no_detach: bool,
    /// Do not keep stdin open
    #[arg(long = "no-interactive")]
    pub no_interactive: bool,
    /// Do not allocate a TTY
    #[arg(long = "no-tty")]
    pub no_tty: bool,
}

impl CreateArgs {
    pub fn to_request(&self) -> CreateContainer {
        CreateContainer {
            name: self.name.clone(),
            image: self.image.clone(),
            network: self.network.clone(),
            pod: self.pod.clone(),
            volume: self.volume.clone(),
            mount_path: self.mount_path.clone(),
            command: self.command.clone(),
            detached: !self.no_detach,
            interactive: !self.no_interactive,
            tty: !self.no_tty,
            ports: self.ports.clone(),
            env: self.env.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    #[command(alias = "ls")]
    List,
    /// Pull an image
    Pull {
        /// Full reference, or a repository when --source is given
        image: String,
        /// Registry host to resolve the repository against
        #[arg(long)]
        source: Option<String>,
        /// Tag used with --source
        #[arg(long)]
        tag: Option<String>,
    },
    /// Build an image from a context directory
    Build {
        context: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = ImageReference::DEFAULT_TAG)]
        tag: String,
    },
    #[command(alias = "rm")]
    Remove { id: String },
}

impl ImageCommand {
    /// Reference to pull, resolved when a source registry is given
    pub fn pull_reference(image: &str, source: Option<&str>, tag: Option<&str>) -> String {
        match source {
            Some(source) => ImageReference::resolve(source, image, tag).to_string(),
            None => image.to_string(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum PodCommand {
    #[command(alias = "ls")]
    List,
    Create {
        name: String,
        #[arg(long)]
        network: Option<String>,
    },
    Start { name: String },
    Stop { name: String },
    #[command(alias = "rm")]
    Remove { name: String },
}

#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    #[command(alias = "ls")]
    List,
    Create {
        name: String,
        /// Subnet in CIDR notation
        #[arg(long)]
        subnet: Option<String>,
    },
    #[command(alias = "rm")]
    Remove { name: String },
}

#[derive(Debug, Subcommand)]
pub enum VolumeCommand {
    #[command(alias = "ls")]
    List,
    Create { name: String },
    #[command(alias = "rm")]
    Remove { name: String },
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// Print every entry
    Show,
    /// Drop every entry
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Check that the engine program can be found
    Check,
    /// Probe the engine and reset stale runtime state after a crash
    Recover,
    /// Permission and SELinux checks on the isolated root
    Security,
}

impl Args {
    /// Layer command line overrides onto a loaded configuration
    pub fn apply_overrides(&self, config: &mut IsopodConfig) {
        if let Some(ref root) = self.root {
            config.root.path = Some(root.clone());
        }
        if let Some(ref engine) = self.engine {
            config.engine.program = engine.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_container_args() {
        let args = Args::try_parse_from([
            "isopod",
            "--root",
            "/srv/pods/alpha",
            "container",
            "create",
            "c1",
            "alpine",
            "--command",
            "sh",
            "-p",
            "8080:80",
            "-e",
            "MODE=dev",
            "--no-tty",
        ])
        .unwrap();

        assert_eq!(args.root, Some(PathBuf::from("/srv/pods/alpha")));
        let Commands::Container(ContainerCommand::Create(create)) = args.command else {
            panic!("expected container create");
        };

        let request = create.to_request();
        assert_eq!(request.name, "c1");
        assert_eq!(request.command.as_deref(), Some("sh"));
        assert_eq!(request.ports, vec![PortMapping::new("8080", "80")]);
        assert_eq!(request.env, vec![EnvVar::new("MODE", "dev")]);
        assert!(request.detached);
        assert!(request.interactive);
        assert!(!request.tty);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = Args::try_parse_from([
            "isopod", "container", "create", "c1", "alpine", "-p", "8080",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exec_collects_trailing_command() {
        let args =
            Args::try_parse_from(["isopod", "container", "exec", "c1", "ls", "-la", "/"]).unwrap();

        match args.command {
            Commands::Container(ContainerCommand::Exec { name, command }) => {
                assert_eq!(name, "c1");
                assert_eq!(command, vec!["ls", "-la", "/"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_aliases_and_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["isopod", "volume", "ls", "-v"]).unwrap();
        assert!(args.verbose);
        assert!(matches!(
            args.command,
            Commands::Volume(VolumeCommand::List)
        ));
    }

    #[test]
    fn test_apply_overrides() {
        let args =
            Args::try_parse_from(["isopod", "--engine", "/opt/podman", "-r", "/tmp/r", "log", "show"])
                .unwrap();
        let mut config = IsopodConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.engine.program, "/opt/podman");
        assert_eq!(config.root.path, Some(PathBuf::from("/tmp/r")));
    }

    #[test]
    fn test_pull_reference_resolution() {
        assert_eq!(
            ImageCommand::pull_reference("alpine", Some("docker.io"), None),
            "docker.io/library/alpine:latest"
        );
        assert_eq!(
            ImageCommand::pull_reference("quay.io/podman/stable:v5", None, None),
            "quay.io/podman/stable:v5"
        );
    }
}
