//! `podman network ls --format json`

use super::{NormalizedTable, format, or_unknown, parse_records};
use crate::command::ResourceKind;
use serde::Deserialize;

pub const HEADER: [&str; 4] = ["Network ID", "Name", "Driver", "Subnet(s)"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NetworkRecord {
    id: Option<String>,
    name: Option<String>,
    driver: Option<String>,
    subnets: Option<Vec<SubnetRecord>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubnetRecord {
    subnet: Option<String>,
}

pub fn parse(raw: &str) -> NormalizedTable {
    let mut table = NormalizedTable::header_only(&HEADER);

    for record in parse_records::<NetworkRecord>(raw, ResourceKind::Network) {
        let subnets = record
            .subnets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| s.subnet)
            .collect::<Vec<_>>()
            .join(", ");

        table.push_row(vec![
            or_unknown(record.id.as_deref().map(format::short_id)),
            or_unknown(record.name),
            or_unknown(record.driver),
            subnets,
        ]);
    }

    table
}
