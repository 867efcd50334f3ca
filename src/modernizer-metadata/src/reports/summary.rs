//! Statistics behind the global summary report.

use crate::record::PullRequestStatus;
use crate::store::ScannedRecord;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Component, Path};

/// Label used for failed records that have no `migrationId`.
const UNKNOWN_RECIPE: &str = "unknown";

/// Aggregate statistics across every record in the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    pub total_migrations: usize,
    pub failed_migrations: usize,

    /// Recipe id and failure count, most failures first. Ties keep the order
    /// in which recipes were first encountered.
    pub failures_by_recipe: Vec<(String, usize)>,

    /// Plugin directories with at least one failed migration, by plugin name.
    pub failed_plugins: Vec<FailedPlugin>,

    pub pull_requests: PullRequestStats,
}

impl SummaryStats {
    /// Percentage of migrations that did not fail; 0 when there are none.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_migrations == 0 {
            return 0.0;
        }
        (self.total_migrations - self.failed_migrations) as f64 / self.total_migrations as f64
            * 100.0
    }
}

/// A plugin directory holding a failure report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FailedPlugin {
    pub name: String,

    /// Plugin directory relative to the store root, `/`-separated; `.` for the root itself.
    pub dir: String,
}

impl FailedPlugin {
    /// Creates an entry for `plugin_dir`, expressed relative to `root`.
    #[must_use]
    pub fn new(name: impl Into<String>, root: &Path, plugin_dir: &Path) -> Self {
        let relative = plugin_dir.strip_prefix(root).unwrap_or(plugin_dir);
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        let dir = if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        };
        Self {
            name: name.into(),
            dir,
        }
    }
}

/// Pull request counts, each pull request counted once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullRequestStats {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub merged: usize,
}

impl PullRequestStats {
    /// Percentage of `count` relative to the total; 0 when there are no pull requests.
    #[must_use]
    pub fn rate(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64 * 100.0
    }
}

/// Computes the summary statistics of a record collection stored under `root`.
#[must_use]
pub fn compute_summary(root: &Path, records: &[ScannedRecord]) -> SummaryStats {
    let failed: Vec<&ScannedRecord> = records.iter().filter(|s| s.record.is_failed()).collect();

    SummaryStats {
        total_migrations: records.len(),
        failed_migrations: failed.len(),
        failures_by_recipe: rank_failures(&failed),
        failed_plugins: failed
            .iter()
            .map(|s| FailedPlugin::new(s.plugin.as_str(), root, &s.plugin_dir))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
        pull_requests: pull_request_stats(records),
    }
}

fn rank_failures(failed: &[&ScannedRecord]) -> Vec<(String, usize)> {
    let mut ranking: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for scanned in failed {
        let id = match scanned.record.migration_id() {
            "" => UNKNOWN_RECIPE,
            id => id,
        };
        match positions.get(id) {
            Some(&index) => ranking[index].1 += 1,
            None => {
                positions.insert(id, ranking.len());
                ranking.push((id.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-encountered order among equal counts.
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking
}

/// Counts pull request states over records that have both a URL and a
/// status, keeping only the first record seen for each URL.
#[must_use]
pub fn pull_request_stats(records: &[ScannedRecord]) -> PullRequestStats {
    let mut seen = HashSet::new();
    let mut stats = PullRequestStats::default();

    for scanned in records {
        let (Some(url), Some(status)) = (
            scanned.record.pull_request_url(),
            scanned.record.pull_request_status,
        ) else {
            continue;
        };
        if !seen.insert(url) {
            continue;
        }

        stats.total += 1;
        match status {
            PullRequestStatus::Open => stats.open += 1,
            PullRequestStatus::Closed => stats.closed += 1,
            PullRequestStatus::Merged => stats.merged += 1,
        }
    }

    stats
}
