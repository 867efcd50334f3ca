//! Rate limit information.

/// Minimum remaining requests before proactively waiting.
pub(crate) const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Maximum time to wait for a rate limit reset (1 hour).
pub(crate) const MAX_WAIT_SECS: u64 = 3600;

/// Rate limit state of the GitHub core API.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Returns how long to wait at `now` (Unix seconds), or `None` if no wait is needed.
    ///
    /// The wait is capped at [`MAX_WAIT_SECS`].
    #[must_use]
    pub fn wait_secs(&self, now: u64) -> Option<u64> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now {
            return None;
        }
        Some((self.reset - now).min(MAX_WAIT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wait_with_enough_remaining() {
        let info = RateLimitInfo {
            remaining: 100,
            reset: 2_000,
            limit: 5_000,
        };
        assert_eq!(info.wait_secs(1_000), None);
    }

    #[test]
    fn no_wait_once_reset_passed() {
        let info = RateLimitInfo {
            remaining: 1,
            reset: 500,
            limit: 5_000,
        };
        assert_eq!(info.wait_secs(1_000), None);
    }

    #[test]
    fn waits_until_reset_capped() {
        let info = RateLimitInfo {
            remaining: 0,
            reset: 1_060,
            limit: 5_000,
        };
        assert_eq!(info.wait_secs(1_000), Some(60));

        let far = RateLimitInfo {
            reset: 1_000 + MAX_WAIT_SECS * 2,
            ..info
        };
        assert_eq!(far.wait_secs(1_000), Some(MAX_WAIT_SECS));
    }
}
