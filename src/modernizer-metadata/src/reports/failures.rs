//! Per-plugin CSV reports of failed migrations.

use super::{ReportError, REPORTS_DIR_NAME};
use crate::store::{write_atomic, ScannedRecord};
use crate::summary::RunSummary;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// File name of the failure report inside a plugin's reports directory.
pub const FAILED_MIGRATIONS_FILE_NAME: &str = "failed_migrations.csv";

/// Column names of the failure report.
const HEADER: [&str; 2] = ["migrationId", "migrationStatus"];

/// Failed records of one plugin directory.
#[derive(Debug, Clone)]
pub struct PluginFailures<'a> {
    /// Plugin name of the first failed record.
    pub plugin: &'a str,

    /// Failed records in scan order.
    pub records: Vec<&'a ScannedRecord>,
}

/// Groups failed records by the plugin directory that holds them.
///
/// Directories without failures are absent from the result.
#[must_use]
pub fn failures_by_plugin(records: &[ScannedRecord]) -> BTreeMap<&Path, PluginFailures<'_>> {
    let mut groups: BTreeMap<&Path, PluginFailures<'_>> = BTreeMap::new();
    for scanned in records.iter().filter(|s| s.record.is_failed()) {
        groups
            .entry(scanned.plugin_dir.as_path())
            .or_insert_with(|| PluginFailures {
                plugin: &scanned.plugin,
                records: Vec::new(),
            })
            .records
            .push(scanned);
    }
    groups
}

/// Renders failed records as CSV with a `migrationId,migrationStatus` header.
#[must_use]
pub fn render_failure_csv(records: &[&ScannedRecord]) -> String {
    let mut csv = HEADER.join(",");
    csv.push('\n');
    for scanned in records {
        csv.push_str(&csv_field(scanned.record.migration_id()));
        csv.push(',');
        csv.push_str(&csv_field(scanned.record.status_label()));
        csv.push('\n');
    }
    csv
}

/// Quotes a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Writes one failure report per plugin with at least one failed migration.
pub fn write_failure_reports(records: &[ScannedRecord]) -> RunSummary {
    let mut summary = RunSummary::new();

    for (plugin_dir, failures) in failures_by_plugin(records) {
        let plugin = failures.plugin;
        match write_plugin_failures(plugin_dir, &failures.records) {
            Ok(path) => {
                info!(
                    plugin,
                    path = %path.display(),
                    "Generated failed_migrations.csv"
                );
                summary.failure_reports += 1;
            }
            Err(e) => {
                error!(plugin, error = %e, "Failed to write failure report");
                summary.outputs_failed += 1;
            }
        }
    }

    summary
}

fn write_plugin_failures(
    plugin_dir: &Path,
    records: &[&ScannedRecord],
) -> Result<PathBuf, ReportError> {
    let path = plugin_dir
        .join(REPORTS_DIR_NAME)
        .join(FAILED_MIGRATIONS_FILE_NAME);
    write_atomic(&path, render_failure_csv(records).as_bytes())?;
    Ok(path)
}
