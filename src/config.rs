//! Runtime configuration.
//!
//! Every section has defaults, so an empty file (or no file) is valid:
//!
//! ```toml
//! root = { path = "/srv/pods/alpha" }
//!
//! [engine]
//! program = "podman"
//! mount_program = "/usr/bin/fuse-overlayfs"
//!
//! [log]
//! file = "/var/log/isopod/operations.jsonl"
//!
//! [security]
//! expected_label = "container_file_t"
//!
//! [normalizer.container_ports]
//! host_port = "HostPort"
//! protocol = "Protocol"
//! ```

use crate::env;
use crate::normalize::Normalizer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loading and saving errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsopodConfig {
    pub engine: EngineConfig,
    pub root: RootConfig,
    pub log: LogConfig,
    pub security: SecurityConfig,
    pub normalizer: Normalizer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable, looked up on `PATH` unless absolute
    pub program: String,
    /// Storage mount program for isolated roots
    pub mount_program: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: env::DEFAULT_ENGINE_PROGRAM.to_string(),
            mount_program: env::DEFAULT_MOUNT_PROGRAM.to_string(),
        }
    }
}

/// Isolated root; `None` uses the engine's default storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Mirror the operation log to disk
    pub persist: bool,
    /// Log file; defaults to `~/.isopod/operations.jsonl`
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            persist: true,
            file: None,
        }
    }
}

impl LogConfig {
    /// File the log should be persisted to, if persistence is enabled
    pub fn persistent_file(&self) -> Option<PathBuf> {
        if !self.persist {
            return None;
        }
        self.file
            .clone()
            .or_else(|| env::home_dir().map(|home| env::operation_log_file_path(&home)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// SELinux type (or full context) expected on isolated storage
    pub expected_label: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            expected_label: env::security::DEFAULT_EXPECTED_LABEL.to_string(),
        }
    }
}

impl IsopodConfig {
    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
