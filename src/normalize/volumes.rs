//! `podman volume ls --format json`

use super::{NormalizedTable, format, or_unknown, parse_records};
use crate::command::ResourceKind;
use serde::Deserialize;

pub const HEADER: [&str; 5] = ["Volume Name", "Driver", "Mountpoint", "Created", "Labels"];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct VolumeRecord {
    name: Option<String>,
    driver: Option<String>,
    mountpoint: Option<String>,
    created_at: Option<String>,
    /// Keys keep the engine's order
    labels: Option<serde_json::Map<String, serde_json::Value>>,
}

pub fn parse(raw: &str) -> NormalizedTable {
    let mut table = NormalizedTable::header_only(&HEADER);

    for record in parse_records::<VolumeRecord>(raw, ResourceKind::Volume) {
        let labels = record
            .labels
            .unwrap_or_default()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        table.push_row(vec![
            or_unknown(record.name),
            or_unknown(record.driver),
            record.mountpoint.unwrap_or_default(),
            record
                .created_at
                .as_deref()
                .map(format::format_rfc3339_date)
                .unwrap_or_default(),
            labels,
        ]);
    }

    table
}
