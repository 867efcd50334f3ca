//! Per-plugin consolidation of migration records.
//!
//! All records of a plugin are merged into
//! `<plugin>/reports/aggregated_migrations.json`, newest first, with the
//! plugin identity hoisted to the top of the document.

use crate::reports::{ReportError, REPORTS_DIR_NAME};
use crate::store::{write_atomic, ScannedRecord};
use crate::summary::RunSummary;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// File name of the aggregated document inside a plugin's reports directory.
pub const AGGREGATED_FILE_NAME: &str = "aggregated_migrations.json";

/// Placeholder used when the newest record lacks an identity field.
const UNKNOWN: &str = "Unknown";

/// All migrations of one plugin, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPlugin {
    /// Plugin name taken from the newest record.
    pub plugin_name: String,

    /// Plugin repository taken from the newest record.
    pub plugin_repository: String,

    /// Migration entries without `pluginName`/`pluginRepository`, each with
    /// the `timestamp` of its file name.
    pub migrations: Vec<Map<String, Value>>,
}

/// Builds the aggregated document for one plugin.
///
/// Returns `None` when `records` is empty.
///
/// # Errors
///
/// Returns an error if a record cannot be converted to JSON.
pub fn aggregate_plugin(
    records: &[&ScannedRecord],
) -> Result<Option<AggregatedPlugin>, serde_json::Error> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| ScannedRecord::newest_first(a, b));

    let Some(newest) = sorted.first() else {
        return Ok(None);
    };

    let plugin_name = newest
        .record
        .plugin_name
        .clone()
        .unwrap_or_else(|| UNKNOWN.to_string());
    let plugin_repository = newest
        .record
        .plugin_repository
        .clone()
        .unwrap_or_else(|| UNKNOWN.to_string());

    let migrations = sorted
        .iter()
        .map(|scanned| migration_entry(scanned))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(AggregatedPlugin {
        plugin_name,
        plugin_repository,
        migrations,
    }))
}

fn migration_entry(scanned: &ScannedRecord) -> Result<Map<String, Value>, serde_json::Error> {
    let mut entry = scanned.record.to_json_map()?;
    entry.shift_remove("pluginName");
    entry.shift_remove("pluginRepository");
    entry.insert(
        "timestamp".to_string(),
        Value::String(scanned.file_stem.clone()),
    );
    Ok(entry)
}

/// Groups records by the plugin directory that holds them.
#[must_use]
pub fn group_by_plugin_dir(records: &[ScannedRecord]) -> BTreeMap<PathBuf, Vec<&ScannedRecord>> {
    let mut groups: BTreeMap<PathBuf, Vec<&ScannedRecord>> = BTreeMap::new();
    for scanned in records {
        groups
            .entry(scanned.plugin_dir.clone())
            .or_default()
            .push(scanned);
    }
    groups
}

/// Writes one aggregated document per plugin directory.
///
/// A plugin whose document cannot be written is logged and counted in
/// [`RunSummary::outputs_failed`]; the others are still written.
pub fn write_aggregates(records: &[ScannedRecord]) -> RunSummary {
    let mut summary = RunSummary::new();

    for (plugin_dir, group) in group_by_plugin_dir(records) {
        match write_plugin_aggregate(&plugin_dir, &group) {
            Ok(Some(path)) => {
                info!(
                    plugin = %group[0].plugin,
                    path = %path.display(),
                    "Aggregated migrations written"
                );
                summary.plugins_aggregated += 1;
            }
            Ok(None) => {}
            Err(e) => {
                error!(path = %plugin_dir.display(), error = %e, "Failed to aggregate plugin");
                summary.outputs_failed += 1;
            }
        }
    }

    if summary.plugins_aggregated == 0 {
        warn!("No plugins with migrations found");
    } else {
        info!(
            count = summary.plugins_aggregated,
            "Aggregation complete"
        );
    }
    summary
}

fn write_plugin_aggregate(
    plugin_dir: &Path,
    records: &[&ScannedRecord],
) -> Result<Option<PathBuf>, ReportError> {
    let path = plugin_dir.join(REPORTS_DIR_NAME).join(AGGREGATED_FILE_NAME);
    let json_error = |source| ReportError::JsonError {
        path: path.display().to_string(),
        source,
    };

    let Some(document) = aggregate_plugin(records).map_err(json_error)? else {
        return Ok(None);
    };
    let content = serde_json::to_string_pretty(&document).map_err(json_error)?;
    write_atomic(&path, content.as_bytes())?;
    Ok(Some(path))
}
