//! `podman images --format json`

use super::{NormalizedTable, UNKNOWN, format, or_unknown, parse_records};
use crate::command::ResourceKind;
use serde::Deserialize;

pub const HEADER: [&str; 5] = ["Repository", "Tag", "Image ID", "Created", "Size"];

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ImageRecord {
    id: Option<String>,
    names: Option<Vec<String>>,
    created: Option<i64>,
    size: Option<f64>,
}

pub fn parse(raw: &str) -> NormalizedTable {
    let mut table = NormalizedTable::header_only(&HEADER);

    for record in parse_records::<ImageRecord>(raw, ResourceKind::Image) {
        let (repository, tag) = record
            .names
            .as_ref()
            .and_then(|names| names.first())
            .map(|name| split_name(name))
            .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()));

        table.push_row(vec![
            repository,
            tag,
            or_unknown(record.id.as_deref().map(format::short_id)),
            record
                .created
                .map(format::format_epoch_date)
                .unwrap_or_default(),
            or_unknown(record.size.map(format::format_megabytes)),
        ]);
    }

    table
}

/// Split `repository:tag`. A colon that belongs to a registry port
/// (`localhost:5000/app`) is not a tag separator.
fn split_name(name: &str) -> (String, String) {
    match name.rsplit_once(':') {
        Some((repository, tag)) if !tag.contains('/') => (repository.to_string(), tag.to_string()),
        _ => (name.to_string(), UNKNOWN.to_string()),
    }
}
