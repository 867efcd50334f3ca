//! Run summary types.

use super::result::RecordOutcome;

/// Summary of a complete run across all commands.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of metadata files refreshed against GitHub.
    pub records_processed: usize,

    /// Number of metadata files rewritten with new remote state.
    pub records_updated: usize,

    /// Number of metadata files already up to date.
    pub records_unchanged: usize,

    /// Number of metadata files without a usable pull request.
    pub records_skipped: usize,

    /// Number of metadata files that could not be refreshed.
    pub records_failed: usize,

    /// Number of records loaded for consolidation and reporting.
    pub records_scanned: usize,

    /// Number of metadata files that could not be parsed.
    pub files_unreadable: usize,

    /// Number of aggregated plugin documents written.
    pub plugins_aggregated: usize,

    /// Number of per-plugin failure reports written.
    pub failure_reports: usize,

    /// Number of per-recipe rollups written.
    pub recipe_reports: usize,

    /// Whether the global summary report was written.
    pub summary_written: bool,

    /// Number of derived files that could not be written.
    pub outputs_failed: usize,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with a refresh outcome.
    pub fn record_result(&mut self, result: &RecordOutcome) {
        self.records_processed += 1;
        match result {
            RecordOutcome::Updated { .. } => self.records_updated += 1,
            RecordOutcome::Unchanged { .. } => self.records_unchanged += 1,
            RecordOutcome::Skipped { .. } => self.records_skipped += 1,
            RecordOutcome::Failed { .. } => self.records_failed += 1,
        }
    }

    /// Adds the counters of another summary to this one.
    pub fn merge(&mut self, other: &RunSummary) {
        self.records_processed += other.records_processed;
        self.records_updated += other.records_updated;
        self.records_unchanged += other.records_unchanged;
        self.records_skipped += other.records_skipped;
        self.records_failed += other.records_failed;
        self.records_scanned = self.records_scanned.max(other.records_scanned);
        self.files_unreadable = self.files_unreadable.max(other.files_unreadable);
        self.plugins_aggregated += other.plugins_aggregated;
        self.failure_reports += other.failure_reports;
        self.recipe_reports += other.recipe_reports;
        self.summary_written |= other.summary_written;
        self.outputs_failed += other.outputs_failed;
    }

    /// Returns true if any per-item failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.records_failed > 0 || self.files_unreadable > 0 || self.outputs_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_record_result() {
        let mut summary = RunSummary::new();

        summary.record_result(&RecordOutcome::Updated {
            path: "foo/modernization-metadata/a.json".to_string(),
        });
        summary.record_result(&RecordOutcome::Skipped {
            path: "foo/modernization-metadata/b.json".to_string(),
            reason: "No pullRequestUrl recorded".to_string(),
        });

        assert_eq!(summary.records_processed, 2);
        assert_eq!(summary.records_updated, 1);
        assert_eq!(summary.records_skipped, 1);
        assert!(!summary.has_failures());
    }

    #[test]
    fn failed_record_is_a_failure() {
        let mut summary = RunSummary::new();
        summary.record_result(&RecordOutcome::Failed {
            path: "a.json".to_string(),
            error: "boom".to_string(),
        });
        assert!(summary.has_failures());
    }

    #[test]
    fn merge_adds_counters() {
        let mut total = RunSummary {
            records_updated: 1,
            records_scanned: 4,
            ..Default::default()
        };
        let other = RunSummary {
            records_updated: 2,
            records_scanned: 4,
            plugins_aggregated: 3,
            summary_written: true,
            ..Default::default()
        };

        total.merge(&other);

        assert_eq!(total.records_updated, 3);
        assert_eq!(total.records_scanned, 4);
        assert_eq!(total.plugins_aggregated, 3);
        assert!(total.summary_written);
    }
}
