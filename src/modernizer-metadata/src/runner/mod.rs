//! Orchestrates metadata refreshes, consolidation and report generation.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::aggregate::write_aggregates;
use crate::enrich::{update_store, GitHubApi, HostingApi};
use crate::reports::generate_reports;
use crate::store::{scan_records, RecordScan};
use crate::summary::RunSummary;
use chrono::{DateTime, Utc};
use tracing::info;

/// Runs the metadata commands against one store.
pub struct Runner {
    config: RunnerConfig,
    api: Option<Box<dyn HostingApi>>,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// A GitHub client is created when the configuration carries a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let api = match config.token().filter(|token| !token.is_empty()) {
            Some(token) => Some(Box::new(GitHubApi::new(token)?) as Box<dyn HostingApi>),
            None => None,
        };
        Ok(Self { config, api })
    }

    /// Replaces the hosting API used to refresh records.
    pub fn with_api(mut self, api: impl HostingApi + 'static) -> Self {
        self.api = Some(Box::new(api));
        self
    }

    /// Refreshes every record in the store from GitHub.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::MissingToken`] without a token, or an error if
    /// the store holds no metadata directories.
    pub async fn update_metadata(&self) -> Result<RunSummary, RunnerError> {
        let api = self.api.as_deref().ok_or(RunnerError::MissingToken)?;
        info!(root = %self.config.root().display(), "Updating migration metadata");
        Ok(update_store(api, self.config.root()).await?)
    }

    /// Writes the aggregated document of every plugin.
    ///
    /// # Errors
    ///
    /// Returns an error if the store root does not exist.
    pub fn consolidate(&self) -> Result<RunSummary, RunnerError> {
        let scan = self.scan()?;
        let mut summary = scanned_summary(&scan);
        summary.merge(&write_aggregates(&scan.records));
        Ok(summary)
    }

    /// Writes failure reports, recipe rollups and the global summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the store root does not exist or the global
    /// summary cannot be written.
    pub fn generate_reports(&self, generated_at: DateTime<Utc>) -> Result<RunSummary, RunnerError> {
        let scan = self.scan()?;
        let mut summary = scanned_summary(&scan);
        summary.merge(&generate_reports(
            self.config.root(),
            &scan.records,
            generated_at,
        )?);
        Ok(summary)
    }

    /// Refreshes records, consolidates them, then generates reports.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any step.
    pub async fn run_all(&self, generated_at: DateTime<Utc>) -> Result<RunSummary, RunnerError> {
        let mut summary = self.update_metadata().await?;
        summary.merge(&self.consolidate()?);
        summary.merge(&self.generate_reports(generated_at)?);
        Ok(summary)
    }

    fn scan(&self) -> Result<RecordScan, RunnerError> {
        Ok(scan_records(self.config.root())?)
    }
}

fn scanned_summary(scan: &RecordScan) -> RunSummary {
    RunSummary {
        records_scanned: scan.records.len(),
        files_unreadable: scan.skipped,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn update_without_token_is_fatal() {
        let temp = TempDir::new().unwrap();
        let runner = Runner::new(RunnerConfig::new(temp.path().to_path_buf())).unwrap();

        let result = runner.update_metadata().await;

        assert!(matches!(result, Err(RunnerError::MissingToken)));
    }

    #[test]
    fn missing_root_is_fatal() {
        let runner = Runner::new(RunnerConfig::new(PathBuf::from("/nonexistent/store"))).unwrap();

        let result = runner.consolidate();

        assert!(matches!(
            result,
            Err(RunnerError::Store(StoreError::MissingRoot { .. }))
        ));
    }

    #[test]
    fn empty_store_is_a_clean_run() {
        let temp = TempDir::new().unwrap();
        let runner = Runner::new(RunnerConfig::new(temp.path().to_path_buf())).unwrap();

        let summary = runner.generate_reports(Utc::now()).unwrap();

        assert_eq!(summary.records_scanned, 0);
        assert!(!summary.summary_written);
        assert!(!summary.has_failures());
    }
}
