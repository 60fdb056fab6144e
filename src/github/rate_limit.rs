//! GitHub API quota status.
//!
//! The gateway reads the quota after every request and warns when it runs low.
//! `RateLimitInfo` captures the values reported by `GET /rate_limit`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Remaining-request count below which the gateway logs a warning.
pub const LOW_QUOTA_THRESHOLD: u32 = 100;

/// Quota values reported by the GitHub API.
///
/// # Example
///
/// ```
/// use gitwarden::github::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 42, 1_700_000_000);
/// assert!(info.is_low());
/// assert_eq!(info.reset_at_rfc3339(), "2023-11-14T22:13:20Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    limit: u32,
    /// Remaining requests in the current window.
    remaining: u32,
    /// Unix timestamp when the quota resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the quota resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true when fewer than [`LOW_QUOTA_THRESHOLD`] requests remain.
    #[must_use]
    pub const fn is_low(&self) -> bool {
        self.remaining < LOW_QUOTA_THRESHOLD
    }

    /// Formats the reset time as RFC 3339, falling back to the raw timestamp
    /// when it cannot be represented.
    #[must_use]
    pub fn reset_at_rfc3339(&self) -> String {
        i64::try_from(self.reset_at)
            .ok()
            .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
            .map_or_else(
                || self.reset_at.to_string(),
                |reset| reset.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
    }
}
