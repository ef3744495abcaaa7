//! Permission and mandatory-access-control inspection.
//!
//! Everything here is advisory. Failures to query are reported as `false`,
//! never as errors, and nothing in this module blocks an operation.

use super::RuntimeRoot;
use crate::env::security::ENFORCING;
use nix::unistd::{AccessFlags, access};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// True only if the invoking user can read, write and traverse `path`.
///
/// Uses `access(2)` so ACLs and effective ids are honoured.
pub fn has_permission(path: &Path) -> bool {
    access(path, AccessFlags::R_OK | AccessFlags::W_OK | AccessFlags::X_OK).is_ok()
}

/// True only if SELinux is enforcing and `path` carries `expected_label`.
///
/// `expected_label` is compared against the full security context when it
/// contains a `:`, otherwise against the context's type field.
pub fn check_mandatory_access_control(path: &Path, expected_label: &str) -> bool {
    if !selinux_enforcing() {
        return false;
    }

    match security_context(path) {
        Some(context) => context_matches(&context, expected_label),
        None => false,
    }
}

/// Advisory findings for an isolated root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityReport {
    /// Every root directory grants read/write/execute
    pub writable: bool,
    /// Storage carries the expected SELinux label under enforcing mode
    pub mac_labelled: bool,
}

/// Run both checks against a provisioned root.
pub fn inspect_root(root: &RuntimeRoot, expected_label: &str) -> SecurityReport {
    let writable =
        has_permission(&root.base) && root.subdirectories().iter().all(|dir| has_permission(dir));

    SecurityReport {
        writable,
        mac_labelled: check_mandatory_access_control(&root.storage, expected_label),
    }
}

fn selinux_enforcing() -> bool {
    match Command::new("getenforce").output() {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim() == ENFORCING
        }
        Ok(output) => {
            debug!("getenforce exited with {:?}", output.status.code());
            false
        }
        Err(e) => {
            debug!("getenforce unavailable: {}", e);
            false
        }
    }
}

fn security_context(path: &Path) -> Option<String> {
    let output = Command::new("stat")
        .arg("--format=%C")
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let context = String::from_utf8_lossy(&output.stdout).trim().to_string();
    // stat prints "?" when the filesystem has no security attributes
    if context.is_empty() || context == "?" {
        None
    } else {
        Some(context)
    }
}

fn context_matches(context: &str, expected_label: &str) -> bool {
    if expected_label.contains(':') {
        return context == expected_label;
    }

    // user:role:type:level
    let mut fields = context.split(':');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(_), Some(_), Some(kind)) => kind == expected_label,
        _ => false,
    }
}
