//! Result normalization.
//!
//! Turns the JSON emitted by the engine's listing subcommands into
//! [`NormalizedTable`]s: a header row followed by display-ready string rows,
//! one per resource. Each resource kind has its own parser module because each
//! listing has its own schema.
//!
//! Parsing never fails. A failed execution, empty output or malformed JSON
//! yields a header-only table; a record that cannot be read is skipped and a
//! missing field becomes [`UNKNOWN`] (or an empty string for timestamps).

use crate::command::ResourceKind;
use crate::executor::ExecutionResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod containers;
pub mod format;
pub mod images;
pub mod networks;
pub mod pods;
pub mod volumes;

pub use containers::PortFieldNames;
pub use format::{
    format_epoch_date, format_epoch_datetime, format_megabytes, format_rfc3339_date, short_id,
};

/// Placeholder for fields missing from a record
pub const UNKNOWN: &str = "Unknown";

/// Header row plus data rows, every row as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    /// Table with only a header row.
    pub fn header_only(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Column names
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, without the header
    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// All rows with the header as row 0
    pub fn rows(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    pub(crate) fn push_row(&mut self, mut row: Vec<String>) {
        debug_assert_eq!(row.len(), self.header.len());
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }
}

/// Dispatches engine output to the parser of each resource kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalizer {
    /// Field names of published ports in container listings
    #[serde(default)]
    pub container_ports: PortFieldNames,
}

impl Normalizer {
    /// Normalizer with a specific container port schema
    pub fn with_container_ports(mut self, ports: PortFieldNames) -> Self {
        self.container_ports = ports;
        self
    }

    /// Header row of a listing
    pub fn header(kind: ResourceKind) -> &'static [&'static str] {
        match kind {
            ResourceKind::Container => &containers::HEADER,
            ResourceKind::Image => &images::HEADER,
            ResourceKind::Pod => &pods::HEADER,
            ResourceKind::Network => &networks::HEADER,
            ResourceKind::Volume => &volumes::HEADER,
            ResourceKind::System => &["Output"],
        }
    }

    /// Parse raw listing output.
    pub fn parse(&self, kind: ResourceKind, raw: &str) -> NormalizedTable {
        match kind {
            ResourceKind::Container => containers::parse_with(raw, &self.container_ports),
            ResourceKind::Image => images::parse(raw),
            ResourceKind::Pod => pods::parse(raw),
            ResourceKind::Network => networks::parse(raw),
            ResourceKind::Volume => volumes::parse(raw),
            ResourceKind::System => {
                let mut table = NormalizedTable::header_only(Self::header(kind));
                for line in raw.lines().filter(|line| !line.trim().is_empty()) {
                    table.push_row(vec![line.to_string()]);
                }
                table
            }
        }
    }

    /// Normalize an execution: header-only unless it succeeded.
    pub fn normalize(&self, kind: ResourceKind, result: &ExecutionResult) -> NormalizedTable {
        if !result.success() {
            debug!(
                "Listing {} failed with exit code {}, returning header only",
                kind, result.exit_code
            );
            return NormalizedTable::header_only(Self::header(kind));
        }
        self.parse(kind, result.stdout_text())
    }
}

/// Decode a JSON array of records, skipping elements that do not fit `T`.
pub(crate) fn parse_records<T: DeserializeOwned>(raw: &str, kind: ResourceKind) -> Vec<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let values: Vec<serde_json::Value> = match serde_json::from_str::<Option<Vec<_>>>(raw) {
        Ok(values) => values.unwrap_or_default(),
        Err(e) => {
            warn!("Unparseable {} listing: {}", kind, e);
            return Vec::new();
        }
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {} record {}: {}", kind, index, e);
                None
            }
        })
        .collect()
}

/// Field value or [`UNKNOWN`]
pub(crate) fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}
