//! A record loaded from the store together with where it came from.

use crate::record::MigrationRecord;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::path::PathBuf;

/// A migration record read from a metadata directory.
#[derive(Debug, Clone)]
pub struct ScannedRecord {
    /// The parsed record.
    pub record: MigrationRecord,

    /// Path of the JSON file the record was read from.
    pub path: PathBuf,

    /// Plugin the record belongs to.
    pub plugin: String,

    /// Plugin directory, i.e. the parent of the metadata directory.
    pub plugin_dir: PathBuf,

    /// File name without the `.json` extension (e.g. `2024-01-01T00-00-00`).
    pub file_stem: String,

    /// Timestamp parsed from [`Self::file_stem`], `None` when unparseable.
    pub timestamp: Option<NaiveDateTime>,
}

impl ScannedRecord {
    /// Orders records newest first.
    ///
    /// Records without a parseable timestamp sort after every dated record;
    /// ties fall back to the file stem, descending.
    #[must_use]
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.file_stem.cmp(&a.file_stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_file_timestamp;

    fn scanned(stem: &str) -> ScannedRecord {
        ScannedRecord {
            record: MigrationRecord::default(),
            path: PathBuf::from(format!("foo/modernization-metadata/{stem}.json")),
            plugin: "foo".to_string(),
            plugin_dir: PathBuf::from("foo"),
            file_stem: stem.to_string(),
            timestamp: parse_file_timestamp(stem),
        }
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let mut records = vec![
            scanned("2024-01-01T00-00-00"),
            scanned("broken"),
            scanned("2024-01-02T00-00-00"),
        ];

        records.sort_by(ScannedRecord::newest_first);

        let stems: Vec<_> = records.iter().map(|r| r.file_stem.as_str()).collect();
        assert_eq!(
            stems,
            ["2024-01-02T00-00-00", "2024-01-01T00-00-00", "broken"]
        );
    }
}
