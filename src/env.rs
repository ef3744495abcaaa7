//! Environment constants and path utilities for isopod.
//!
//! This module centralizes all hardcoded program names, paths and directory
//! names used throughout the application, making them easier to maintain and
//! modify. The isolated-root layout below is an on-disk contract: renaming any
//! of these breaks every root that was already provisioned.

use std::path::{Path, PathBuf};

/// Container engine executable invoked for every operation
pub const DEFAULT_ENGINE_PROGRAM: &str = "podman";

/// Storage mount program passed to the engine for isolated roots
pub const DEFAULT_MOUNT_PROGRAM: &str = "/usr/bin/fuse-overlayfs";

/// Environment variable pointing the engine at its runtime directory
pub const XDG_RUNTIME_DIR_VAR: &str = "XDG_RUNTIME_DIR";

/// User-level application directory name (hidden directory like .git)
pub const ISOPOD_DIR_NAME: &str = ".isopod";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration file name looked up directly in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "isopod.toml";

/// Durable operation log file name (JSON lines)
pub const OPERATION_LOG_FILE_NAME: &str = "operations.jsonl";

/// Isolated root layout: `<root>/data/{storage,run,tmp,xdg}`
pub mod root {
    /// Directory holding all engine state under an isolated root
    pub const DATA_DIR_NAME: &str = "data";

    /// Image and container storage (`--root`)
    pub const STORAGE_DIR_NAME: &str = "storage";

    /// Runtime state (`--runroot`), removed after a detected crash
    pub const RUN_DIR_NAME: &str = "run";

    /// Temporary files (`--tmpdir`)
    pub const TMP_DIR_NAME: &str = "tmp";

    /// XDG runtime directory exported through the environment
    pub const XDG_DIR_NAME: &str = "xdg";
}

/// Security-related constants
pub mod security {
    /// SELinux type expected on container storage
    pub const DEFAULT_EXPECTED_LABEL: &str = "container_file_t";

    /// Value reported by `getenforce` when SELinux is enforcing
    pub const ENFORCING: &str = "Enforcing";
}

/// Build the data directory path of an isolated root
pub fn data_dir_path(root: &Path) -> PathBuf {
    root.join(root::DATA_DIR_NAME)
}

/// Build the storage directory path of an isolated root
pub fn storage_dir_path(root: &Path) -> PathBuf {
    data_dir_path(root).join(root::STORAGE_DIR_NAME)
}

/// Build the run directory path of an isolated root
pub fn run_dir_path(root: &Path) -> PathBuf {
    data_dir_path(root).join(root::RUN_DIR_NAME)
}

/// Build the temp directory path of an isolated root
pub fn tmp_dir_path(root: &Path) -> PathBuf {
    data_dir_path(root).join(root::TMP_DIR_NAME)
}

/// Build the XDG runtime directory path of an isolated root
pub fn xdg_dir_path(root: &Path) -> PathBuf {
    data_dir_path(root).join(root::XDG_DIR_NAME)
}

/// Build the config directory path in the user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(ISOPOD_DIR_NAME)
}

/// Build the config file path in the user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build the local config file path in the current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(ISOPOD_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Build the durable operation log path in the user's home directory
pub fn operation_log_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(OPERATION_LOG_FILE_NAME)
}

/// Get home directory path
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// System-wide configuration file
pub fn system_config_file_path() -> PathBuf {
    PathBuf::from("/etc/isopod").join(CONFIG_FILE_NAME)
}
