//! Timestamps encoded in metadata file names.
//!
//! Records are stored as `YYYY-MM-DDTHH-MM-SS.json`; the colons of the time
//! portion are replaced by dashes so the name is valid on every filesystem.

use chrono::NaiveDateTime;

/// Format used once colons are restored in the time portion.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used when a timestamp is rendered into a report.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses the stem of a metadata file name into a timestamp.
///
/// Returns `None` when the stem does not follow `YYYY-MM-DDTHH-MM-SS`.
#[must_use]
pub fn parse_file_timestamp(stem: &str) -> Option<NaiveDateTime> {
    let (date, time) = stem.split_once('T')?;
    let restored = format!("{date}T{}", time.replace('-', ":"));
    NaiveDateTime::parse_from_str(&restored, PARSE_FORMAT).ok()
}

/// Renders a timestamp for reports.
#[must_use]
pub fn display_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_file_name_timestamp() {
        let parsed = parse_file_timestamp("2024-01-02T13-45-07").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(13, 45, 7)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn rejects_malformed_stems() {
        assert!(parse_file_timestamp("latest").is_none());
        assert!(parse_file_timestamp("2024-01-02").is_none());
        assert!(parse_file_timestamp("2024-13-02T00-00-00").is_none());
    }

    #[test]
    fn renders_with_colons() {
        let parsed = parse_file_timestamp("2024-01-02T03-04-05").unwrap();
        assert_eq!(display_timestamp(&parsed), "2024-01-02T03:04:05");
    }
}
