//! Cell formatting shared by the listing parsers.

use chrono::{DateTime, Utc};

/// Length of the short form of engine identifiers
pub const SHORT_ID_LEN: usize = 12;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// First 12 characters of an identifier.
pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Unix epoch seconds as `YYYY-mm-dd` (UTC); empty when out of range.
pub fn format_epoch_date(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Unix epoch seconds as `YYYY-mm-dd HH:MM:SS UTC`; empty when out of range.
pub fn format_epoch_datetime(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

/// RFC 3339 timestamp converted to UTC as `YYYY-mm-dd`; empty when malformed.
pub fn format_rfc3339_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Byte count as megabytes with two decimals, e.g. `7.38 MB`.
pub fn format_megabytes(bytes: f64) -> String {
    format!("{:.2} MB", bytes / BYTES_PER_MEGABYTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(
            short_id("d1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0"),
            "d1a2b3c4d5e6"
        );
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
    }

    #[test]
    fn test_epoch_formats() {
        assert_eq!(format_epoch_date(1_700_000_000), "2023-11-14");
        assert_eq!(format_epoch_datetime(1_700_000_000), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_epoch_date(i64::MAX), "");
    }

    #[test]
    fn test_rfc3339_date_converts_to_utc() {
        assert_eq!(
            format_rfc3339_date("2024-03-01T22:30:00.123456789-05:00"),
            "2024-03-02"
        );
        assert_eq!(format_rfc3339_date("2024-03-01T10:00:00Z"), "2024-03-01");
        assert_eq!(format_rfc3339_date("yesterday"), "");
        assert_eq!(format_rfc3339_date(""), "");
    }

    #[test]
    fn test_megabytes() {
        assert_eq!(format_megabytes(7_740_000.0), "7.38 MB");
        assert_eq!(format_megabytes(0.0), "0.00 MB");
        assert_eq!(format_megabytes(1_048_576.0), "1.00 MB");
    }
}
