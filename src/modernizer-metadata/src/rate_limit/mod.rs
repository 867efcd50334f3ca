//! Rate limiting utilities for the GitHub core API.
//!
//! Each record costs several core API calls, so the enricher checks the
//! remaining budget before refreshing a record and sleeps until the window
//! resets when it runs low.

mod info;

pub use info::RateLimitInfo;

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Checks the current rate limit status for the core API (pulls, repos, checks).
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}

/// Waits if the rate limit is low, returning true if we waited.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let Some(wait_secs) = info.wait_secs(now) else {
        return false;
    };

    if info.reset.saturating_sub(now) > wait_secs {
        warn!(
            reset = info.reset,
            wait_secs, "Rate limit reset too far in future, capping wait time"
        );
    }
    info!(
        remaining = info.remaining,
        limit = info.limit,
        wait_secs,
        "Rate limit low, waiting for reset"
    );

    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
    true
}

/// Ensures sufficient rate limit before making core API calls.
///
/// # Errors
///
/// Returns an error if the rate limit check fails.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let info = check_core_rate_limit(octocrab).await?;
    wait_if_needed(&info).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_if_needed_no_wait() {
        let info = RateLimitInfo {
            remaining: 100,
            reset: 0,
            limit: 1000,
        };

        assert!(!wait_if_needed(&info).await);
    }

    #[tokio::test]
    async fn test_wait_if_needed_reset_passed() {
        let info = RateLimitInfo {
            remaining: 1,
            reset: 0,
            limit: 30,
        };

        assert!(!wait_if_needed(&info).await);
    }
}
