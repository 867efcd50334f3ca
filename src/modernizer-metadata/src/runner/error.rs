//! Runner error types.

use crate::enrich::EnrichError;
use crate::reports::ReportError;
use crate::store::StoreError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Refreshing records requires a GitHub token.
    #[error("GH_TOKEN environment variable not set")]
    MissingToken,

    /// Fatal enrichment errors.
    #[error(transparent)]
    Enrich(#[from] EnrichError),

    /// Store scanning errors.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Report generation errors.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),
}
