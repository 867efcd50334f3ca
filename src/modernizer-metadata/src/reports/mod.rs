//! Derived reports built from the metadata store.
//!
//! Three kinds of reports are produced from one scan:
//! per-plugin failure CSVs, per-recipe JSON rollups and a global Markdown
//! summary under `<root>/reports/`.

mod error;
mod failures;
mod recipes;
mod summary;

pub use error::ReportError;
pub use failures::{
    failures_by_plugin, render_failure_csv, write_failure_reports, PluginFailures,
    FAILED_MIGRATIONS_FILE_NAME,
};
pub use recipes::{
    recipe_file_name, rollup_recipes, write_recipe_reports, RecipeApplication, RecipeRollup,
};
pub use summary::{
    compute_summary, pull_request_stats, FailedPlugin, PullRequestStats, SummaryStats,
};

use crate::store::{write_atomic, ScannedRecord};
use crate::summary::RunSummary;
use crate::templates::TemplateRenderer;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

/// Name of the report directories, both per plugin and at the store root.
pub const REPORTS_DIR_NAME: &str = "reports";

/// Directory below `<root>/reports` holding the recipe rollups.
pub const RECIPES_DIR_NAME: &str = "recipes";

/// File name of the global summary.
pub const SUMMARY_FILE_NAME: &str = "summary.md";

/// Generates every report for the given records.
///
/// Failure reports and recipe rollups are written per item; one that cannot
/// be written is logged and counted without stopping the rest. When
/// `records` is empty nothing is written.
///
/// # Errors
///
/// Returns an error if the global summary cannot be rendered or written.
pub fn generate_reports(
    root: &Path,
    records: &[ScannedRecord],
    generated_at: DateTime<Utc>,
) -> Result<RunSummary, ReportError> {
    let mut summary = RunSummary::new();
    if records.is_empty() {
        warn!("No metadata found");
        return Ok(summary);
    }

    summary.merge(&write_failure_reports(records));
    summary.merge(&write_recipe_reports(root, records));

    let stats = compute_summary(root, records);
    let body = TemplateRenderer::new().render_summary(&stats, generated_at)?;
    let path = root.join(REPORTS_DIR_NAME).join(SUMMARY_FILE_NAME);
    write_atomic(&path, body.as_bytes())?;
    summary.summary_written = true;

    info!(
        path = %path.display(),
        total = stats.total_migrations,
        failed = stats.failed_migrations,
        "Summary report generated"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_file_timestamp, MigrationRecord, MigrationStatus};
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn scanned(root: &Path, plugin: &str, stem: &str, status: MigrationStatus) -> ScannedRecord {
        let plugin_dir = root.join(plugin);
        ScannedRecord {
            record: MigrationRecord {
                plugin_name: Some(plugin.to_string()),
                migration_id: Some("R1".to_string()),
                migration_status: Some(status),
                ..Default::default()
            },
            path: plugin_dir.join(format!("modernization-metadata/{stem}.json")),
            plugin: plugin.to_string(),
            plugin_dir,
            file_stem: stem.to_string(),
            timestamp: parse_file_timestamp(stem),
        }
    }

    #[test]
    fn empty_store_writes_nothing() {
        let temp = TempDir::new().unwrap();

        let summary = generate_reports(temp.path(), &[], Utc::now()).unwrap();

        assert!(!summary.summary_written);
        assert!(!temp.path().join(REPORTS_DIR_NAME).exists());
    }

    #[test]
    fn writes_all_report_kinds() {
        let temp = TempDir::new().unwrap();
        let records = vec![
            scanned(temp.path(), "foo", "2024-01-01T00-00-00", MigrationStatus::Fail),
            scanned(temp.path(), "foo", "2024-01-02T00-00-00", MigrationStatus::Success),
        ];
        let generated_at = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();

        let summary = generate_reports(temp.path(), &records, generated_at).unwrap();

        assert_eq!(summary.failure_reports, 1);
        assert_eq!(summary.recipe_reports, 1);
        assert!(summary.summary_written);

        let body =
            fs::read_to_string(temp.path().join(REPORTS_DIR_NAME).join(SUMMARY_FILE_NAME)).unwrap();
        assert!(body.contains("Generated on: 2024-02-01 12:00:00 UTC"));
        assert!(body.contains("- **Success Rate**: 50.00%"));
        assert!(body.contains("- R1: 1 failures"));
        assert!(temp
            .path()
            .join(REPORTS_DIR_NAME)
            .join(RECIPES_DIR_NAME)
            .join("R1.json")
            .is_file());
    }
}
