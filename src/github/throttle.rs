//! Token bucket pacing outbound GitHub requests.
//!
//! The bucket holds a single token that refills once per interval, so
//! requests are spaced at least one interval apart. The default interval of
//! 800 ms (1.25 requests per second, 4500 per hour) stays below GitHub's
//! authenticated quota of 5000 per hour, leaving room for other users of the
//! same token.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use super::error::GitHubError;

/// Default spacing between requests.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(800);

/// Single-token bucket shared by every request made through one gateway.
#[derive(Debug)]
pub struct RequestThrottle {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    /// Creates a throttle that grants one request per `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Interval between granted requests.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until a request slot is available.
    ///
    /// The first call is granted immediately. Each call reserves the next
    /// slot before waiting, so sequential callers are spaced one interval
    /// apart even if the previous request finished quickly.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Cancelled`] if `cancel` fires before the slot
    /// arrives, including when it has already fired.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), GitHubError> {
        if cancel.is_cancelled() {
            return Err(GitHubError::Cancelled);
        }

        let slot = self.reserve_slot().await;

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(GitHubError::Cancelled),
            () = sleep_until(slot) => Ok(()),
        }
    }

    async fn reserve_slot(&self) -> Instant {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let slot = next_slot.map_or(now, |reserved| reserved.max(now));
        *next_slot = Some(slot + self.interval);
        slot
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_INTERVAL)
    }
}
