//! [`HostingApi`] backed by the GitHub REST API.

use super::{BranchHead, CheckRunInfo, EnrichError, HostingApi, PullRequestInfo};
use crate::rate_limit::ensure_core_rate_limit;
use crate::record::PullRequestStatus;
use async_trait::async_trait;
use octocrab::models::IssueState;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Check runs requested per page.
const CHECK_RUNS_PER_PAGE: u8 = 100;

/// GitHub client used to refresh migration records.
#[derive(Clone)]
pub struct GitHubApi {
    octocrab: Octocrab,
}

impl GitHubApi {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new(token: &str) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self { octocrab })
    }
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Deserialize)]
struct CheckRunsPage {
    total_count: u64,
    check_runs: Vec<CheckRunEntry>,
}

#[derive(Deserialize)]
struct CheckRunEntry {
    name: String,
    conclusion: Option<String>,
}

#[derive(Deserialize)]
struct BranchResponse {
    commit: BranchCommit,
}

#[derive(Deserialize)]
struct BranchCommit {
    sha: String,
}

#[async_trait]
impl HostingApi for GitHubApi {
    async fn pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestInfo, EnrichError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let pull = self.octocrab.pulls(owner, repo).get(number).await?;

        let state = match pull.state {
            Some(IssueState::Open) => PullRequestStatus::Open,
            Some(IssueState::Closed) => PullRequestStatus::Closed,
            other => {
                return Err(EnrichError::LookupFailed {
                    message: format!("pull request {owner}/{repo}#{number} has state {other:?}"),
                })
            }
        };
        let merged = pull.merged.unwrap_or(false) || pull.merged_at.is_some();

        Ok(PullRequestInfo {
            state,
            merged,
            head_sha: pull.head.sha.clone(),
        })
    }

    async fn check_runs(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<CheckRunInfo>, EnrichError> {
        let route = format!("/repos/{owner}/{repo}/commits/{sha}/check-runs");
        let mut runs = Vec::new();
        let mut page = 1;

        loop {
            let params = PageParams {
                per_page: CHECK_RUNS_PER_PAGE,
                page,
            };
            let response: CheckRunsPage = self.octocrab.get(&route, Some(&params)).await?;
            let received = response.check_runs.len();
            runs.extend(response.check_runs.into_iter().map(|run| CheckRunInfo {
                name: run.name,
                conclusion: run.conclusion,
            }));

            if received == 0 || runs.len() as u64 >= response.total_count {
                break;
            }
            page += 1;
        }

        debug!(count = runs.len(), sha, "Fetched check runs");
        Ok(runs)
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> Result<BranchHead, EnrichError> {
        let repository = self.octocrab.repos(owner, repo).get().await?;
        let name = repository
            .default_branch
            .ok_or_else(|| EnrichError::MissingDefaultBranch {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })?;

        let route = branch_route(owner, repo, &name)?;
        let branch: BranchResponse = self.octocrab.get(&route, None::<&()>).await?;

        Ok(BranchHead {
            name,
            sha: branch.commit.sha,
        })
    }
}

/// Builds the branch route with every segment percent-encoded.
fn branch_route(owner: &str, repo: &str, branch: &str) -> Result<String, EnrichError> {
    let invalid = || EnrichError::LookupFailed {
        message: format!("cannot build branch route for {owner}/{repo}@{branch}"),
    };

    let mut url = Url::parse("https://api.github.com/").map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .clear()
        .extend(["repos", owner, repo, "branches", branch]);
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_route_encodes_segments() {
        assert_eq!(
            branch_route("jenkinsci", "foo-plugin", "main").unwrap(),
            "/repos/jenkinsci/foo-plugin/branches/main"
        );
        assert_eq!(
            branch_route("o", "r", "fix#1?x").unwrap(),
            "/repos/o/r/branches/fix%231%3Fx"
        );
    }
}
