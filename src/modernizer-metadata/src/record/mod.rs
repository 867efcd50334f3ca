//! Migration records as written by the modernizer.
//!
//! Each migration run leaves one JSON document under
//! `<plugin>/modernization-metadata/<timestamp>.json`. Every known key is
//! modelled explicitly; keys this crate does not know about are kept in
//! [`MigrationRecord::extra`] so rewriting a record never loses data, and
//! records read from disk are written back in their original key order.

mod layout;
mod status;
mod timestamp;

pub use layout::SourceLayout;
pub use status::{CheckRunsSummary, MigrationStatus, PullRequestStatus, UnknownStatus};
pub use timestamp::{display_timestamp, parse_file_timestamp, DISPLAY_FORMAT};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Check run name to conclusion. A `None` conclusion means the run is still in progress.
pub type CheckRuns = BTreeMap<String, Option<String>>;

/// One migration attempt for one plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jenkins_baseline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_baseline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_baseline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jenkins_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpu_baseline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Identifier of the recipe that was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "status::empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub migration_status: Option<MigrationStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additions: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletions: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_files: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_url: Option<String>,

    #[serde(
        default,
        deserialize_with = "status::empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub pull_request_status: Option<PullRequestStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_runs: Option<CheckRuns>,

    #[serde(
        default,
        deserialize_with = "status::empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_runs_summary: Option<CheckRunsSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch_latest_commit_sha: Option<String>,

    /// Keys not modelled above, preserved in file order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Source object of a record read from JSON; empty for new records.
    #[serde(skip)]
    pub layout: SourceLayout,
}

impl MigrationRecord {
    /// Parses a record from a JSON object, remembering its key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not a valid record.
    pub fn from_json_map(source: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut record: Self = serde_json::from_value(Value::Object(source.clone()))?;
        record.layout = SourceLayout::new(source);
        Ok(record)
    }

    /// Converts the record to a JSON object laid out like the object it was read from.
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be serialized.
    pub fn to_json_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let fields = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(self.layout.arrange(fields))
    }

    /// Returns the migration status as written in reports; empty when none was recorded.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        self.migration_status.map_or("", |s| s.as_str())
    }

    /// Returns true if the migration run failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.migration_status == Some(MigrationStatus::Fail)
    }

    /// Returns the recipe identifier, or an empty string when missing.
    #[must_use]
    pub fn migration_id(&self) -> &str {
        self.migration_id.as_deref().unwrap_or_default()
    }

    /// Returns the pull request URL when one is recorded and non-empty.
    #[must_use]
    pub fn pull_request_url(&self) -> Option<&str> {
        self.pull_request_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
