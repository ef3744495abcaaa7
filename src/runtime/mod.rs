//! Isolated runtime roots for independent engine instances.
//!
//! An isolated root is a self-contained directory tree that holds one engine
//! instance's storage, runtime state, temp files and XDG runtime directory, so
//! several instances can coexist on one host without sharing state:
//!
//! ```text
//! <root>/
//! └── data/
//!     ├── storage/   --root
//!     ├── run/       --runroot (stale after a crash, reset before reuse)
//!     ├── tmp/       --tmpdir
//!     └── xdg/       XDG_RUNTIME_DIR
//! ```
//!
//! - [`provision`]: creates and validates the tree ([`ensure_root`])
//! - [`security`]: advisory permission and SELinux checks

use crate::env;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod provision;
pub mod security;

pub use provision::{ensure_root, reset_run_dir};
pub use security::{SecurityReport, check_mandatory_access_control, has_permission, inspect_root};

/// Provisioning errors.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The root does not exist and its parent cannot host it
    #[error("Parent directory {} does not exist or is not usable", parent.display())]
    ParentNotUsable { parent: PathBuf },

    /// Directory creation failed
    #[error("Failed to create directory {}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory removal failed
    #[error("Failed to remove directory {}", path.display())]
    RemoveDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Paths backing one isolated engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeRoot {
    /// Base directory chosen by the user
    pub base: PathBuf,
    /// Image and container storage
    pub storage: PathBuf,
    /// Runtime state
    pub run: PathBuf,
    /// Temporary files
    pub tmp: PathBuf,
    /// XDG runtime directory
    pub xdg: PathBuf,
}

impl RuntimeRoot {
    /// Derive the layout under `base` without touching the filesystem.
    pub fn at(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            storage: env::storage_dir_path(&base),
            run: env::run_dir_path(&base),
            tmp: env::tmp_dir_path(&base),
            xdg: env::xdg_dir_path(&base),
            base,
        }
    }

    /// All four engine subdirectories, in creation order.
    pub fn subdirectories(&self) -> [&Path; 4] {
        [&self.storage, &self.run, &self.tmp, &self.xdg]
    }

    /// True when every subdirectory exists on disk.
    pub fn is_complete(&self) -> bool {
        self.subdirectories().iter().all(|dir| dir.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_layout_derivation() {
        let root = RuntimeRoot::at("/var/lib/isopod/one");

        assert_eq!(root.base, Path::new("/var/lib/isopod/one"));
        assert_eq!(root.storage, Path::new("/var/lib/isopod/one/data/storage"));
        assert_eq!(root.run, Path::new("/var/lib/isopod/one/data/run"));
        assert_eq!(root.tmp, Path::new("/var/lib/isopod/one/data/tmp"));
        assert_eq!(root.xdg, Path::new("/var/lib/isopod/one/data/xdg"));
    }

    #[test]
    fn test_missing_root_is_incomplete() {
        let root = RuntimeRoot::at("/nonexistent/isopod/root");
        assert!(!root.is_complete());
    }
}
