//! Status enums stored inside migration records.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a single migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    /// The recipe applied cleanly.
    Success,
    /// The recipe or its verification failed.
    Fail,
}

impl MigrationStatus {
    /// Returns the status as stored in metadata files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }
}

/// State of the pull request opened by a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatus {
    Open,
    Closed,
    Merged,
}

impl PullRequestStatus {
    /// Returns the status as stored in metadata files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Merged => "merged",
        }
    }
}

/// Overall outcome of the check runs attached to a pull request head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckRunsSummary {
    /// At least one check has not concluded yet.
    Pending,
    /// At least one check failed, timed out or was cancelled.
    Failure,
    /// Every check succeeded.
    Success,
    /// Mixed benign outcomes such as `skipped` or `neutral`.
    Neutral,
}

impl CheckRunsSummary {
    /// Returns the summary as stored in metadata files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Failure => "failure",
            Self::Success => "success",
            Self::Neutral => "neutral",
        }
    }
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownStatus {
    kind: &'static str,
    value: String,
}

macro_rules! impl_status_str {
    ($ty:ty, $kind:literal, [$($variant:ident),+]) => {
        impl FromStr for $ty {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == Self::$variant.as_str() {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownStatus {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_status_str!(MigrationStatus, "migration status", [Success, Fail]);
impl_status_str!(PullRequestStatus, "pull request status", [Open, Closed, Merged]);
impl_status_str!(CheckRunsSummary, "check runs summary", [Pending, Failure, Success, Neutral]);

/// Deserializes an optional status where an empty string means "not recorded".
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_statuses_to_string() {
        assert_eq!(MigrationStatus::Fail.as_str(), "fail");
        assert_eq!(PullRequestStatus::Merged.to_string(), "merged");
        assert_eq!(CheckRunsSummary::Neutral.as_str(), "neutral");
    }

    #[test]
    fn parses_known_statuses() {
        assert_eq!("success".parse(), Ok(MigrationStatus::Success));
        assert_eq!("closed".parse(), Ok(PullRequestStatus::Closed));
        assert_eq!("pending".parse(), Ok(CheckRunsSummary::Pending));
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "broken".parse::<MigrationStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown migration status 'broken'");
    }
}
