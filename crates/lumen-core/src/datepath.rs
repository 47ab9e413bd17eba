//! Date-partitioned output path derivation.
//!
//! Renditions land under a `yyyy/yyyy-mm/yyyy-mm-dd` partition keyed by the
//! image's capture date, falling back to the current date for assets
//! without one.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Datetime layouts accepted for capture timestamps. EXIF uses `:` as the
/// date separator; exported sidecar data tends toward ISO 8601.
const DATETIME_FORMATS: &[&str] = &[
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y:%m:%d", "%Y-%m-%d"];

/// Derive the date partition for an optional capture date.
///
/// A present, parseable `capture_date` determines the partition; anything
/// else formats from the current local date.
pub fn resolve(capture_date: Option<&str>) -> String {
    let date = capture_date
        .and_then(parse_capture_date)
        .unwrap_or_else(|| Local::now().date_naive());
    format_partition(date)
}

/// The partition for the current local date.
pub fn today() -> String {
    format_partition(Local::now().date_naive())
}

/// Parse a capture timestamp into a calendar date, normalizing the EXIF
/// `YYYY:MM:DD HH:MM:SS` layout alongside ISO variants.
fn parse_capture_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    tracing::debug!("Unparseable capture date {raw:?} — using current date");
    None
}

fn format_partition(date: NaiveDate) -> String {
    date.format("%Y/%Y-%m/%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exif_timestamp() {
        assert_eq!(
            resolve(Some("2023:06:15 10:22:00")),
            "2023/2023-06/2023-06-15"
        );
    }

    #[test]
    fn test_iso_timestamp() {
        assert_eq!(
            resolve(Some("2021-02-03T18:00:09")),
            "2021/2021-02/2021-02-03"
        );
        assert_eq!(
            resolve(Some("2021-02-03T18:00:09+02:00")),
            "2021/2021-02/2021-02-03"
        );
    }

    #[test]
    fn test_date_only() {
        assert_eq!(resolve(Some("2019:12:31")), "2019/2019-12/2019-12-31");
    }

    #[test]
    fn test_absent_uses_current_date() {
        assert_eq!(resolve(None), today());
    }

    #[test]
    fn test_unparseable_uses_current_date() {
        assert_eq!(resolve(Some("not a date")), today());
        assert_eq!(resolve(Some("")), today());
    }

    #[test]
    fn test_partition_is_zero_padded() {
        assert_eq!(resolve(Some("2024:01:05 00:00:01")), "2024/2024-01/2024-01-05");
    }
}
