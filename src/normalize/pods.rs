//! `podman pod ps --format json`

use super::{NormalizedTable, format, or_unknown, parse_records};
use crate::command::ResourceKind;
use serde::Deserialize;
use serde_json::Value;

pub const HEADER: [&str; 7] = [
    "Pod ID",
    "Name",
    "Status",
    "Created",
    "Infra ID",
    "# of Containers",
    "Network(s)",
];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct PodRecord {
    id: Option<String>,
    name: Option<String>,
    status: Option<String>,
    created: Option<String>,
    infra_id: Option<String>,
    containers: Option<Vec<Value>>,
    networks: Option<Vec<String>>,
}

pub fn parse(raw: &str) -> NormalizedTable {
    let mut table = NormalizedTable::header_only(&HEADER);

    for record in parse_records::<PodRecord>(raw, ResourceKind::Pod) {
        table.push_row(vec![
            or_unknown(record.id.as_deref().map(format::short_id)),
            or_unknown(record.name),
            or_unknown(record.status),
            record
                .created
                .as_deref()
                .map(format::format_rfc3339_date)
                .unwrap_or_default(),
            record
                .infra_id
                .as_deref()
                .map(format::short_id)
                .unwrap_or_default(),
            record.containers.map(|c| c.len()).unwrap_or(0).to_string(),
            record.networks.unwrap_or_default().join(","),
        ]);
    }

    table
}
