//! Pull request URL parsing.

use super::EnrichError;
use std::fmt;
use url::Url;

/// A pull request identified by repository and number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Pull request number.
    pub number: u64,
}

impl PullRequestRef {
    /// Parses a URL of the form `https://<host>/<owner>/<repo>/pull/<number>`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::InvalidPullRequestUrl`] if the URL does not have
    /// that shape.
    pub fn parse(url: &str) -> Result<Self, EnrichError> {
        let invalid = |reason: &str| EnrichError::InvalidPullRequestUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [owner, repo, "pull", number, ..] => {
                let number = number
                    .parse()
                    .map_err(|_| invalid("pull request number is not numeric"))?;
                Ok(Self {
                    owner: (*owner).to_string(),
                    repo: (*repo).to_string(),
                    number,
                })
            }
            _ => Err(invalid("expected <owner>/<repo>/pull/<number>")),
        }
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
