//! Per-recipe rollups across all plugins.

use super::{ReportError, RECIPES_DIR_NAME, REPORTS_DIR_NAME};
use crate::record::{display_timestamp, MigrationStatus};
use crate::store::{write_atomic, ScannedRecord};
use crate::summary::RunSummary;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// How often one recipe was applied and with what outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRollup {
    pub migration_id: String,
    pub total_applications: usize,
    pub success_count: usize,
    pub failure_count: usize,

    /// Applications sorted newest first.
    pub plugins: Vec<RecipeApplication>,
}

/// One application of a recipe to a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeApplication {
    pub plugin_name: String,

    /// `success`, `fail`, or empty when no status was recorded.
    pub migration_status: String,

    /// Rendered as `YYYY-MM-DDTHH:MM:SS`; `null` when the file name has no timestamp.
    pub timestamp: Option<String>,
}

/// Builds one rollup per distinct `migrationId`, ordered by id.
///
/// Records without a `migrationId` are left out.
#[must_use]
pub fn rollup_recipes(records: &[ScannedRecord]) -> Vec<RecipeRollup> {
    let mut groups: BTreeMap<&str, Vec<&ScannedRecord>> = BTreeMap::new();
    for scanned in records {
        let id = scanned.record.migration_id();
        if id.is_empty() {
            debug!(path = %scanned.path.display(), "Record has no migrationId");
            continue;
        }
        groups.entry(id).or_default().push(scanned);
    }

    groups
        .into_iter()
        .map(|(id, mut group)| {
            group.sort_by(|a, b| ScannedRecord::newest_first(a, b));
            let count = |status| {
                group
                    .iter()
                    .filter(|s| s.record.migration_status == Some(status))
                    .count()
            };

            RecipeRollup {
                migration_id: id.to_string(),
                total_applications: group.len(),
                success_count: count(MigrationStatus::Success),
                failure_count: count(MigrationStatus::Fail),
                plugins: group
                    .iter()
                    .map(|s| RecipeApplication {
                        plugin_name: s.plugin.clone(),
                        migration_status: s.record.status_label().to_string(),
                        timestamp: s.timestamp.as_ref().map(display_timestamp),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Maps a recipe id to a safe file name.
///
/// Characters outside `[A-Za-z0-9._-]` become `_`.
#[must_use]
pub fn recipe_file_name(migration_id: &str) -> String {
    let stem: String = migration_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.json")
}

/// Writes every recipe rollup to `<root>/reports/recipes/`.
pub fn write_recipe_reports(root: &Path, records: &[ScannedRecord]) -> RunSummary {
    let mut summary = RunSummary::new();
    let dir = root.join(REPORTS_DIR_NAME).join(RECIPES_DIR_NAME);

    for rollup in rollup_recipes(records) {
        match write_rollup(&dir, &rollup) {
            Ok(path) => {
                debug!(recipe = %rollup.migration_id, path = %path.display(), "Recipe rollup written");
                summary.recipe_reports += 1;
            }
            Err(e) => {
                error!(recipe = %rollup.migration_id, error = %e, "Failed to write recipe rollup");
                summary.outputs_failed += 1;
            }
        }
    }

    info!(
        count = summary.recipe_reports,
        path = %dir.display(),
        "Recipe rollups generated"
    );
    summary
}

fn write_rollup(dir: &Path, rollup: &RecipeRollup) -> Result<PathBuf, ReportError> {
    let path = dir.join(recipe_file_name(&rollup.migration_id));
    let content = serde_json::to_string_pretty(rollup).map_err(|e| ReportError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;
    write_atomic(&path, content.as_bytes())?;
    Ok(path)
}
