//! Runner configuration.

use std::path::{Path, PathBuf};

/// Configuration for a metadata run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Root of the metadata store.
    root: PathBuf,
    /// GitHub token; only required when refreshing records.
    token: Option<String>,
}

impl RunnerConfig {
    /// Creates a configuration for the store at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root, token: None }
    }

    /// Sets the GitHub token used for API calls.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configured GitHub token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_optional() {
        let config = RunnerConfig::new(PathBuf::from("metadata"));
        assert_eq!(config.root(), Path::new("metadata"));
        assert!(config.token().is_none());

        let config = config.with_token("ghp_example");
        assert_eq!(config.token(), Some("ghp_example"));
    }
}
