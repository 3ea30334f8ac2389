//! Parsing of command-line values.

use chrono::{Local, NaiveDateTime, TimeZone};
use hostreport_spec::DISK_KEY_GROUP;
use regex::Regex;

/// Format of `--start` / `--end` values.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Parses a `YYYYMMDDhhmmss` local timestamp into Unix seconds.
///
/// Ambiguous local times (a repeated hour when clocks go back) resolve to the
/// earlier instant; nonexistent ones (skipped by a clock change) are rejected.
pub fn parse_timestamp(text: &str) -> Result<i64, String> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| format!("expected YYYYMMDDhhmmss, got '{}': {}", text, e))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| format!("'{}' does not exist in the local time zone", text))
}

/// Checks that a disk pattern compiles and has the `disk` capture group.
pub fn parse_disk_pattern(text: &str) -> Result<String, String> {
    let re = Regex::new(text).map_err(|e| format!("invalid regex: {}", e))?;
    if !re.capture_names().any(|name| name == Some(DISK_KEY_GROUP)) {
        return Err(format!(
            "pattern needs a capture group named '{}', e.g. (?P<{}>\\w+)",
            DISK_KEY_GROUP, DISK_KEY_GROUP
        ));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_local() {
        let secs = parse_timestamp("20231114221320").unwrap();
        let expected = Local
            .with_ymd_and_hms(2023, 11, 14, 22, 13, 20)
            .earliest()
            .unwrap()
            .timestamp();
        assert_eq!(secs, expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_other_formats() {
        assert!(parse_timestamp("2023-11-14 22:13:20").is_err());
        assert!(parse_timestamp("20231314000000").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_parse_disk_pattern() {
        assert!(parse_disk_pattern(r"diskstat_(?P<disk>\w+)_percent_io_time").is_ok());
        assert!(parse_disk_pattern(r"diskstat_(\w+)_percent_io_time")
            .unwrap_err()
            .contains("capture group named 'disk'"));
        assert!(parse_disk_pattern(r"diskstat_(").is_err());
    }
}
