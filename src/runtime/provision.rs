//! Filesystem provisioning for isolated roots.
//!
//! Provisioning is idempotent: an existing base directory is never recreated
//! or cleared, and `create_dir_all` tolerates directories that already exist
//! (including ones created concurrently by another caller).

use super::{ProvisionError, Result, RuntimeRoot, security};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Make sure `path` is a usable isolated root and return its layout.
///
/// - An existing directory is treated as already provisioned. Missing
///   subdirectories are filled in, existing content is left untouched.
/// - A missing directory requires an existing parent with read, write and
///   execute permission; otherwise nothing is created.
///
/// # Errors
///
/// Returns [`ProvisionError::ParentNotUsable`] when the parent cannot host the
/// root, or [`ProvisionError::CreateDirectory`] when creation fails.
pub fn ensure_root(path: &Path) -> Result<RuntimeRoot> {
    let root = RuntimeRoot::at(path);

    if path.is_dir() {
        debug!("Isolated root already exists: {}", path.display());
    } else {
        let parent = match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => {
                return Err(ProvisionError::ParentNotUsable {
                    parent: path.to_path_buf(),
                });
            }
        };

        if !(parent.is_dir() && security::has_permission(parent)) {
            warn!(
                "Refusing to provision {}: parent {} missing or not writable",
                path.display(),
                parent.display()
            );
            return Err(ProvisionError::ParentNotUsable {
                parent: parent.to_path_buf(),
            });
        }

        create_dir(path)?;
        info!("Created isolated root: {}", path.display());
    }

    for dir in root.subdirectories() {
        create_dir(dir)?;
    }

    Ok(root)
}

/// Remove the stale run directory left behind by a crashed engine and
/// recreate it empty.
///
/// # Errors
///
/// Returns an error if the directory cannot be removed or recreated.
pub fn reset_run_dir(root: &RuntimeRoot) -> Result<()> {
    if root.run.is_dir() {
        fs::remove_dir_all(&root.run).map_err(|source| ProvisionError::RemoveDirectory {
            path: root.run.clone(),
            source,
        })?;
        info!("Removed stale run directory: {}", root.run.display());
    }

    create_dir(&root.run)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| ProvisionError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}
