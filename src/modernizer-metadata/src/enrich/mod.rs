//! Pull request and check run enrichment of stored records.
//!
//! For every record that references a pull request, the enricher looks up
//! the pull request state, the check runs of its head commit and the
//! repository's default branch, then rewrites the record file if anything
//! changed.

mod api;
mod check_runs;
mod error;
mod github;
mod pull_request_url;

pub use api::{BranchHead, CheckRunInfo, HostingApi, PullRequestInfo};
pub use check_runs::{collect_check_runs, summarize_check_runs};
pub use error::EnrichError;
pub use github::GitHubApi;
pub use pull_request_url::PullRequestRef;

use crate::record::MigrationRecord;
use crate::store::{find_metadata_dirs, load_record, record_files, save_record, METADATA_DIR_NAME};
use crate::summary::{RecordOutcome, RunSummary};
use std::path::Path;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Returns a copy of `record` refreshed from the hosting service.
///
/// Every lookup is performed before anything is modified, so an error leaves
/// no partially refreshed state behind. The check run mapping and its summary
/// are only replaced when the mapping differs from the stored one.
///
/// # Errors
///
/// Returns [`EnrichError::MissingPullRequestUrl`] or
/// [`EnrichError::InvalidPullRequestUrl`] when the record cannot be refreshed,
/// and any lookup error reported by `api`.
pub async fn refresh<A>(api: &A, record: &MigrationRecord) -> Result<MigrationRecord, EnrichError>
where
    A: HostingApi + ?Sized,
{
    let url = record
        .pull_request_url()
        .ok_or(EnrichError::MissingPullRequestUrl)?;
    let pr = PullRequestRef::parse(url)?;
    info!(pull_request = %pr, "Extracted pull request");

    let pull = api.pull_request(&pr.owner, &pr.repo, pr.number).await?;
    let runs = api.check_runs(&pr.owner, &pr.repo, &pull.head_sha).await?;
    let branch = api.default_branch(&pr.owner, &pr.repo).await?;

    let mut updated = record.clone();
    updated.pull_request_status = Some(pull.status());

    let check_runs = collect_check_runs(runs);
    if updated.check_runs.as_ref() != Some(&check_runs) {
        let summary = summarize_check_runs(check_runs.values().map(Option::as_deref));
        info!(pull_request = %pr, check_runs = ?check_runs, "Check runs updated");
        info!(pull_request = %pr, summary = %summary, "Check runs summary updated");
        updated.check_runs = Some(check_runs);
        updated.check_runs_summary = Some(summary);
    }

    info!(
        default_branch = %branch.name,
        latest_commit_sha = %branch.sha,
        "Resolved default branch"
    );
    updated.default_branch = Some(branch.name);
    updated.default_branch_latest_commit_sha = Some(branch.sha);

    Ok(updated)
}

/// Refreshes one metadata file in place.
///
/// Never fails: every problem is logged and reported through the returned
/// [`RecordOutcome`].
pub async fn refresh_file<A>(api: &A, path: &Path) -> RecordOutcome
where
    A: HostingApi + ?Sized,
{
    let span = info_span!("refresh", path = %path.display());

    async {
        info!("Processing file");
        let path_str = path.display().to_string();

        let record = match load_record(path) {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Failed to read record");
                return RecordOutcome::Failed {
                    path: path_str,
                    error: e.to_string(),
                };
            }
        };

        match refresh(api, &record).await {
            Ok(updated) if updated == record => {
                debug!("Record already up to date");
                RecordOutcome::Unchanged { path: path_str }
            }
            Ok(updated) => match save_record(path, &updated) {
                Ok(()) => {
                    info!("Updated pull request status and branch info");
                    RecordOutcome::Updated { path: path_str }
                }
                Err(e) => {
                    error!(error = %e, "Failed to write record");
                    RecordOutcome::Failed {
                        path: path_str,
                        error: e.to_string(),
                    }
                }
            },
            Err(e) if e.is_skip() => {
                warn!(error = %e, "Skipping record");
                RecordOutcome::Skipped {
                    path: path_str,
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                error!(
                    error = %e,
                    "Failed to update pull request status and branch info"
                );
                RecordOutcome::Failed {
                    path: path_str,
                    error: e.to_string(),
                }
            }
        }
    }
    .instrument(span)
    .await
}

/// Refreshes every record below `root`.
///
/// Records are processed one at a time; a failure on one record never stops
/// the others.
///
/// # Errors
///
/// Returns [`EnrichError::NoMetadataDirectories`] when the root holds no
/// metadata directory, or a store error when the root is missing.
pub async fn update_store<A>(api: &A, root: &Path) -> Result<RunSummary, EnrichError>
where
    A: HostingApi + ?Sized,
{
    let dirs = find_metadata_dirs(root)?;
    if dirs.is_empty() {
        return Err(EnrichError::NoMetadataDirectories {
            root: root.display().to_string(),
            dir_name: METADATA_DIR_NAME.to_string(),
        });
    }
    info!(count = dirs.len(), "Found metadata directories");

    let mut summary = RunSummary::new();
    for dir in &dirs {
        info!(path = %dir.display(), "Processing directory");
        let files = match record_files(dir, true) {
            Ok(files) => files,
            Err(e) => {
                error!(path = %dir.display(), error = %e, "Failed to list metadata directory");
                continue;
            }
        };

        for file in files {
            let outcome = refresh_file(api, &file).await;
            summary.record_result(&outcome);
        }
    }

    info!(
        processed = summary.records_processed,
        updated = summary.records_updated,
        skipped = summary.records_skipped,
        failed = summary.records_failed,
        "Metadata refresh complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CheckRunsSummary, PullRequestStatus};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FakeApi {
        merged: bool,
        conclusions: Vec<(&'static str, Option<&'static str>)>,
        fail_branch: bool,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn new(conclusions: Vec<(&'static str, Option<&'static str>)>) -> Self {
            Self {
                merged: false,
                conclusions,
                fail_branch: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HostingApi for FakeApi {
        async fn pull_request(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
        ) -> Result<PullRequestInfo, EnrichError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PullRequestInfo {
                state: PullRequestStatus::Open,
                merged: self.merged,
                head_sha: "head".to_string(),
            })
        }

        async fn check_runs(
            &self,
            _owner: &str,
            _repo: &str,
            sha: &str,
        ) -> Result<Vec<CheckRunInfo>, EnrichError> {
            assert_eq!(sha, "head");
            Ok(self
                .conclusions
                .iter()
                .map(|(name, conclusion)| CheckRunInfo {
                    name: (*name).to_string(),
                    conclusion: conclusion.map(str::to_string),
                })
                .collect())
        }

        async fn default_branch(
            &self,
            _owner: &str,
            _repo: &str,
        ) -> Result<BranchHead, EnrichError> {
            if self.fail_branch {
                return Err(EnrichError::LookupFailed {
                    message: "branch not found".to_string(),
                });
            }
            Ok(BranchHead {
                name: "main".to_string(),
                sha: "cafe".to_string(),
            })
        }
    }

    fn record_with_pr() -> MigrationRecord {
        MigrationRecord {
            plugin_name: Some("foo".to_string()),
            pull_request_url: Some("https://github.com/jenkinsci/foo-plugin/pull/3".to_string()),
            pull_request_status: Some(PullRequestStatus::Open),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn refresh_fills_remote_state() {
        let mut api = FakeApi::new(vec![("Jenkins", Some("success")), ("CodeQL", Some("skipped"))]);
        api.merged = true;

        let updated = refresh(&api, &record_with_pr()).await.unwrap();

        assert_eq!(updated.pull_request_status, Some(PullRequestStatus::Merged));
        assert_eq!(updated.check_runs_summary, Some(CheckRunsSummary::Neutral));
        assert_eq!(updated.check_runs.unwrap().len(), 2);
        assert_eq!(updated.default_branch.as_deref(), Some("main"));
        assert_eq!(updated.default_branch_latest_commit_sha.as_deref(), Some("cafe"));
    }

    #[tokio::test]
    async fn refresh_keeps_summary_when_checks_unchanged() {
        let api = FakeApi::new(vec![("Jenkins", Some("success"))]);
        let mut record = record_with_pr();
        record.check_runs = Some(collect_check_runs([CheckRunInfo {
            name: "Jenkins".to_string(),
            conclusion: Some("success".to_string()),
        }]));
        record.check_runs_summary = Some(CheckRunsSummary::Pending);

        let updated = refresh(&api, &record).await.unwrap();

        assert_eq!(updated.check_runs_summary, Some(CheckRunsSummary::Pending));
    }

    #[tokio::test]
    async fn refresh_requires_pull_request_url() {
        let api = FakeApi::new(vec![]);
        let result = refresh(&api, &MigrationRecord::default()).await;

        assert!(matches!(result, Err(EnrichError::MissingPullRequestUrl)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refresh_file_rewrites_only_on_change() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("foo").join(METADATA_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("2024-01-01T00-00-00.json");
        save_record(&path, &record_with_pr()).unwrap();
        let api = FakeApi::new(vec![("Jenkins", None)]);

        let first = refresh_file(&api, &path).await;
        let after_first = fs::read_to_string(&path).unwrap();
        let second = refresh_file(&api, &path).await;

        assert!(matches!(first, RecordOutcome::Updated { .. }));
        assert!(matches!(second, RecordOutcome::Unchanged { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
        assert!(after_first.contains("\"checkRunsSummary\": \"pending\""));
    }

    #[tokio::test]
    async fn lookup_failure_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("foo").join(METADATA_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("2024-01-01T00-00-00.json");
        save_record(&path, &record_with_pr()).unwrap();
        let before = fs::read_to_string(&path).unwrap();
        let mut api = FakeApi::new(vec![("Jenkins", Some("success"))]);
        api.fail_branch = true;

        let outcome = refresh_file(&api, &path).await;

        assert!(matches!(outcome, RecordOutcome::Failed { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn update_store_continues_past_bad_records() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("foo").join(METADATA_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("2024-01-01T00-00-00.json"), "{ broken").unwrap();
        fs::write(dir.join("2024-01-02T00-00-00.json"), r#"{"pluginName": "foo"}"#).unwrap();
        save_record(&dir.join("2024-01-03T00-00-00.json"), &record_with_pr()).unwrap();
        let api = FakeApi::new(vec![("Jenkins", Some("success"))]);

        let summary = update_store(&api, temp.path()).await.unwrap();

        assert_eq!(summary.records_processed, 3);
        assert_eq!(summary.records_failed, 1);
        assert_eq!(summary.records_skipped, 1);
        assert_eq!(summary.records_updated, 1);
    }

    #[tokio::test]
    async fn update_store_without_metadata_dirs_fails() {
        let temp = TempDir::new().unwrap();
        let api = FakeApi::new(vec![]);

        let result = update_store(&api, temp.path()).await;

        assert!(matches!(
            result,
            Err(EnrichError::NoMetadataDirectories { .. })
        ));
    }
}
