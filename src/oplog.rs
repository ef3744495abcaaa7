//! Operation log shared by every resource manager.
//!
//! One [`OperationLog`] is created per process and cloned into each manager;
//! clones share the same entries. Entries are append-only and ordered by
//! insertion. The only way to drop them is [`OperationLog::clear`].
//!
//! A persistent log mirrors every entry into a JSON-lines file so the history
//! survives restarts.
//!
//! ```rust,no_run
//! use isopod::oplog::OperationLog;
//!
//! # async fn example() -> std::io::Result<()> {
//! let log = OperationLog::persistent("/home/dev/.isopod/operations.jsonl").await?;
//! log.add("Attempting to pull docker.io/library/alpine:latest").await;
//!
//! for entry in log.read().await {
//!     println!("{}", entry);
//! }
//! # Ok(())
//! # }
//! ```

use crate::executor::{ExecutionResult, display_argv};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Timestamped log message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.message
        )
    }
}

#[derive(Debug, Default)]
struct LogState {
    entries: Vec<LogEntry>,
    file: Option<PathBuf>,
}

/// Append-only log of executed operations.
#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    state: Arc<RwLock<LogState>>,
}

impl OperationLog {
    /// In-memory log
    pub fn new() -> Self {
        Self::default()
    }

    /// Log backed by a JSON-lines file.
    ///
    /// Existing entries are loaded; lines that do not decode are skipped. The
    /// file and its parent directory are created when missing.
    pub async fn persistent(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let entries = match fs::read_to_string(&path).await {
            Ok(content) => decode_lines(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        Ok(Self {
            state: Arc::new(RwLock::new(LogState {
                entries,
                file: Some(path),
            })),
        })
    }

    /// Backing file, if persistent
    pub async fn file(&self) -> Option<PathBuf> {
        self.state.read().await.file.clone()
    }

    /// Append one entry describing an execution.
    pub async fn record(&self, result: &ExecutionResult) {
        self.add(describe(result)).await;
    }

    /// Append an arbitrary message.
    pub async fn add(&self, message: impl Into<String>) {
        let entry = LogEntry::new(message);
        let (summary, detail) = split_summary(&entry.message);
        info!(target: "isopod::oplog", "{}", summary);
        if let Some(detail) = detail {
            debug!(target: "isopod::oplog", "{}", detail);
        }

        let mut state = self.state.write().await;
        if let Some(path) = &state.file
            && let Err(e) = append_line(path, &entry).await
        {
            warn!("Failed to persist log entry to {}: {}", path.display(), e);
        }
        state.entries.push(entry);
    }

    /// Entries in insertion order
    pub async fn read(&self) -> Vec<LogEntry> {
        self.state.read().await.entries.clone()
    }

    /// Number of entries
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Drop every entry, truncating the backing file.
    pub async fn clear(&self) -> std::io::Result<()> {
        let mut state = self.state.write().await;
        if let Some(path) = &state.file {
            fs::write(path, b"").await?;
        }
        state.entries.clear();
        Ok(())
    }
}

/// Human-readable summary of an execution.
pub fn describe(result: &ExecutionResult) -> String {
    let argv = display_argv(&result.argv);
    if result.success() {
        format!(
            "Command executed successfully: {}\nOutput: {}",
            argv,
            result.stdout_text().trim_end()
        )
    } else {
        format!(
            "Command failed with return code {}: {}\nError output: {}",
            result.exit_code,
            argv,
            result.stderr_text().trim_end()
        )
    }
}

/// First line of a message and the rest, if any. Engine output stays out of
/// the info stream.
fn split_summary(message: &str) -> (&str, Option<&str>) {
    match message.split_once('\n') {
        Some((summary, detail)) => (summary, Some(detail)),
        None => (message, None),
    }
}

fn decode_lines(content: &str, path: &Path) -> Vec<LogEntry> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed entry in {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

async fn append_line(path: &Path, entry: &LogEntry) -> std::io::Result<()> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn result(exit_code: i32, stdout: &str, stderr: &str) -> ExecutionResult {
        ExecutionResult {
            argv: vec!["podman".to_string(), "rm".to_string(), "c1".to_string()],
            exit_code,
            stdout: Some(stdout.to_string()),
            stderr: Some(stderr.to_string()),
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_describe_success_and_failure() {
        assert_eq!(
            describe(&result(0, "c1\n", "")),
            "Command executed successfully: podman rm c1\nOutput: c1"
        );
        assert_eq!(
            describe(&result(125, "", "Error: no such container c1\n")),
            "Command failed with return code 125: podman rm c1\nError output: Error: no such container c1"
        );
    }

    #[test]
    fn test_describe_quotes_arguments() {
        let mut run = result(0, "", "");
        run.argv = vec![
            "podman".to_string(),
            "exec".to_string(),
            "c1".to_string(),
            "echo hi".to_string(),
        ];
        assert!(describe(&run).contains("podman exec c1 'echo hi'"));
    }

    #[test]
    fn test_listing_output_stays_out_of_summary() {
        let message = describe(&result(0, "[{\"Name\": \"v1\"}]\n", ""));
        let (summary, detail) = split_summary(&message);

        assert_eq!(summary, "Command executed successfully: podman rm c1");
        assert_eq!(detail, Some("Output: [{\"Name\": \"v1\"}]"));
        assert_eq!(split_summary("Attempting to pull alpine"), ("Attempting to pull alpine", None));
    }

    #[test]
    fn test_entry_display() {
        let entry = LogEntry {
            timestamp: DateTime::parse_from_rfc3339("2024-06-01T09:05:03+00:00")
                .unwrap()
                .with_timezone(&Local),
            message: "hello".to_string(),
        };
        let rendered = entry.to_string();
        assert!(rendered.ends_with(": hello"));
        assert_eq!(rendered.len(), "YYYY-mm-dd HH:MM:SS: hello".len());
    }

    #[tokio::test]
    async fn test_append_only_ordering() {
        let log = OperationLog::new();
        log.add("first").await;
        log.record(&result(0, "ok", "")).await;
        log.record(&result(1, "", "boom")).await;

        let entries = log.read().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "first");
        assert!(entries[1].message.starts_with("Command executed successfully"));
        assert!(entries[2].message.starts_with("Command failed with return code 1"));

        log.clear().await.unwrap();
        assert!(log.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let log = OperationLog::new();
        let other = log.clone();

        other.add("from clone").await;
        assert_eq!(log.len().await, 1);
    }

    #[tokio::test]
    async fn test_persistent_log_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("operations.jsonl");

        let log = OperationLog::persistent(&path).await.unwrap();
        log.add("one").await;
        log.add("two").await;
        drop(log);

        let reopened = OperationLog::persistent(&path).await.unwrap();
        let messages: Vec<_> = reopened
            .read()
            .await
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["one", "two"]);

        reopened.clear().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        assert!(
            OperationLog::persistent(&path)
                .await
                .unwrap()
                .is_empty()
                .await
        );
    }

    #[tokio::test]
    async fn test_persistent_log_skips_malformed_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("operations.jsonl");
        let good = serde_json::to_string(&LogEntry::new("kept")).unwrap();
        std::fs::write(&path, format!("{{broken\n{}\n\n", good)).unwrap();

        let log = OperationLog::persistent(&path).await.unwrap();
        let entries = log.read().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
    }
}
