//! Enrichment error types.

use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while refreshing a record from GitHub.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A lookup returned a response that cannot be used.
    #[error("Lookup failed: {message}")]
    LookupFailed { message: String },

    /// The record has no pull request to refresh.
    #[error("No pullRequestUrl recorded")]
    MissingPullRequestUrl,

    /// The pull request URL does not point at a pull request.
    #[error("Invalid pull request URL '{url}': {reason}")]
    InvalidPullRequestUrl { url: String, reason: String },

    /// The repository reports no default branch.
    #[error("Repository {owner}/{repo} has no default branch")]
    MissingDefaultBranch { owner: String, repo: String },

    /// No metadata directories exist below the root.
    #[error("No '{dir_name}' directories found under {root}")]
    NoMetadataDirectories { root: String, dir_name: String },

    /// Reading or writing the metadata store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EnrichError {
    /// Returns true if the record cannot be refreshed at all and should be skipped.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::MissingPullRequestUrl | Self::InvalidPullRequestUrl { .. }
        )
    }
}
