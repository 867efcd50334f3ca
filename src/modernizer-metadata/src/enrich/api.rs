//! Remote repository-hosting lookups used by the enricher.

use super::EnrichError;
use crate::record::PullRequestStatus;
use async_trait::async_trait;

/// Pull request state as reported by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    /// Raw state, either open or closed.
    pub state: PullRequestStatus,

    /// Whether the pull request was merged.
    pub merged: bool,

    /// SHA of the pull request head commit.
    pub head_sha: String,
}

impl PullRequestInfo {
    /// Returns `merged` for merged pull requests, otherwise the raw state.
    #[must_use]
    pub fn status(&self) -> PullRequestStatus {
        if self.merged {
            PullRequestStatus::Merged
        } else {
            self.state
        }
    }
}

/// A single check run attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRunInfo {
    /// Check run name.
    pub name: String,

    /// Conclusion, `None` while the run is in progress.
    pub conclusion: Option<String>,
}

/// Default branch of a repository and its latest commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchHead {
    /// Branch name (e.g. "main").
    pub name: String,

    /// SHA of the latest commit on the branch.
    pub sha: String,
}

/// Lookups the enricher needs from the repository-hosting service.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Fetches a pull request by number.
    async fn pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestInfo, EnrichError>;

    /// Lists every check run attached to a commit.
    async fn check_runs(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<CheckRunInfo>, EnrichError>;

    /// Fetches the default branch and its latest commit.
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<BranchHead, EnrichError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_overrides_raw_state() {
        let info = PullRequestInfo {
            state: PullRequestStatus::Closed,
            merged: true,
            head_sha: "abc".to_string(),
        };
        assert_eq!(info.status(), PullRequestStatus::Merged);
    }

    #[test]
    fn unmerged_keeps_raw_state() {
        let info = PullRequestInfo {
            state: PullRequestStatus::Open,
            merged: false,
            head_sha: "abc".to_string(),
        };
        assert_eq!(info.status(), PullRequestStatus::Open);
    }
}
