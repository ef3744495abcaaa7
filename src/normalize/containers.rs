//! `podman ps -a --format json`
//!
//! Published ports have changed shape between engine releases: current
//! releases emit `{"host_port": 8080, "protocol": "tcp", ...}` while older ones
//! emit `{"HostPort": 8080, "Protocol": "tcp"}`. The key names are configurable
//! through [`PortFieldNames`].

use super::{NormalizedTable, format, or_unknown, parse_records};
use crate::command::ResourceKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HEADER: [&str; 7] = [
    "CONTAINER ID",
    "IMAGE",
    "COMMAND",
    "CREATED",
    "STATUS",
    "PORTS",
    "NAMES",
];

/// Keys of a published-port object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortFieldNames {
    pub host_port: String,
    pub protocol: String,
}

impl PortFieldNames {
    /// `host_port` / `protocol`, emitted by current engines
    pub fn snake_case() -> Self {
        Self {
            host_port: "host_port".to_string(),
            protocol: "protocol".to_string(),
        }
    }

    /// `HostPort` / `Protocol`, emitted by older engines
    pub fn pascal_case() -> Self {
        Self {
            host_port: "HostPort".to_string(),
            protocol: "Protocol".to_string(),
        }
    }
}

impl Default for PortFieldNames {
    fn default() -> Self {
        Self::snake_case()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ContainerRecord {
    id: Option<String>,
    image: Option<String>,
    command: Option<Vec<String>>,
    created: Option<i64>,
    created_at: Option<String>,
    status: Option<String>,
    ports: Option<Vec<Value>>,
    names: Option<Vec<String>>,
}

/// Parse with the default port schema.
pub fn parse(raw: &str) -> NormalizedTable {
    parse_with(raw, &PortFieldNames::default())
}

/// Parse with an explicit port schema.
pub fn parse_with(raw: &str, ports: &PortFieldNames) -> NormalizedTable {
    let mut table = NormalizedTable::header_only(&HEADER);

    for record in parse_records::<ContainerRecord>(raw, ResourceKind::Container) {
        let created = match (record.created, record.created_at) {
            (Some(secs), _) => format::format_epoch_datetime(secs),
            (None, Some(created_at)) => created_at,
            (None, None) => String::new(),
        };

        table.push_row(vec![
            or_unknown(record.id.as_deref().map(format::short_id)),
            or_unknown(record.image),
            record.command.unwrap_or_default().join(" "),
            created,
            record.status.unwrap_or_default(),
            format_ports(record.ports.as_deref().unwrap_or_default(), ports),
            record.names.unwrap_or_default().join(", "),
        ]);
    }

    table
}

/// `hostPort/protocol` pairs joined by `", "`. Ports without a host side are
/// not published and are left out.
fn format_ports(ports: &[Value], fields: &PortFieldNames) -> String {
    ports
        .iter()
        .filter_map(|port| {
            let host = scalar(port.get(&fields.host_port)?)?;
            match port.get(&fields.protocol).and_then(scalar) {
                Some(protocol) => Some(format!("{}/{}", host, protocol)),
                None => Some(host),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
