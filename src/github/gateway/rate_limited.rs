//! Octocrab-backed gateway with request throttling and quota warnings.

use std::future::Future;

use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::github::error::GitHubError;
use crate::github::pagination::PageRequest;
use crate::github::rate_limit::RateLimitInfo;
use crate::github::throttle::RequestThrottle;
use crate::github::token::PersonalAccessToken;

use super::client::build_octocrab_client;
use super::error_mapping::{FailureKind, classify, describe, map_octocrab_error};

/// Octocrab-backed gateway owning the run's request throttle.
///
/// One instance is built per run and passed by reference to every component
/// that talks to GitHub. All list requests go through
/// [`OctocrabGateway::execute_with_rate_limit`].
pub struct OctocrabGateway {
    client: Octocrab,
    throttle: RequestThrottle,
    cancel: CancellationToken,
}

impl OctocrabGateway {
    /// Creates a gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, throttle: RequestThrottle, cancel: CancellationToken) -> Self {
        Self {
            client,
            throttle,
            cancel,
        }
    }

    /// Builds an authenticated gateway for `api_base`.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when the base URI cannot be parsed or
    /// `GitHubError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &str,
        throttle: RequestThrottle,
        cancel: CancellationToken,
    ) -> Result<Self, GitHubError> {
        let client = build_octocrab_client(token, api_base)?;
        Ok(Self::new(client, throttle, cancel))
    }

    /// Runs `operation` once a throttle slot is available.
    ///
    /// After the operation finishes, successfully or not, the remaining quota
    /// is read and a warning is logged when it is low. That check never
    /// changes the returned value.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Cancelled`] without running `operation` when the
    /// run is cancelled while waiting, or when cancellation interrupts the
    /// operation. Otherwise returns whatever `operation` returned.
    pub async fn execute_with_rate_limit<T, F, Fut>(&self, operation: F) -> Result<T, GitHubError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, GitHubError>> + Send,
    {
        self.throttle.acquire(&self.cancel).await?;

        let outcome = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(GitHubError::Cancelled),
            result = operation() => result,
        };

        self.warn_if_quota_low().await;
        outcome
    }

    async fn warn_if_quota_low(&self) {
        let status = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return,
            status = self.fetch_rate_limit() => status,
        };

        match status {
            Ok(info) if info.is_low() => tracing::warn!(
                remaining = info.remaining(),
                limit = info.limit(),
                reset_at = %info.reset_at_rfc3339(),
                "GitHub API rate limit is getting low: {}/{} requests remaining, resets at {}",
                info.remaining(),
                info.limit(),
                info.reset_at_rfc3339()
            ),
            Ok(_) => {}
            Err(error) => tracing::debug!("rate limit status check failed: {error}"),
        }
    }

    pub(super) async fn fetch_rate_limit(&self) -> Result<RateLimitInfo, GitHubError> {
        let rate = self
            .client
            .ratelimit()
            .get()
            .await
            .map_err(|error| map_octocrab_error("rate limit", &error))?
            .rate;
        let limit = u32::try_from(rate.limit).map_err(|_| GitHubError::Api {
            message: format!("rate limit value out of range: {}", rate.limit),
        })?;
        let remaining = u32::try_from(rate.remaining).map_err(|_| GitHubError::Api {
            message: format!("rate limit value out of range: {}", rate.remaining),
        })?;
        Ok(RateLimitInfo::new(limit, remaining, rate.reset))
    }

    /// Fetches one page through the throttle, returning its items and
    /// whether a `next` link was present.
    pub(super) async fn fetch_page<T>(
        &self,
        operation: &str,
        path: &str,
        filters: &[(&'static str, String)],
        request: PageRequest,
    ) -> Result<(Vec<T>, bool), GitHubError>
    where
        T: DeserializeOwned + Send,
    {
        let mut query: Vec<(&'static str, String)> = filters.to_vec();
        query.extend(request.query());

        self.execute_with_rate_limit(|| async {
            match self.client.get::<Page<T>, _, _>(path, Some(&query)).await {
                Ok(page) => {
                    let has_next = page.next.is_some();
                    Ok((page.items, has_next))
                }
                Err(error) => Err(self.map_octocrab_error_with_rate_limit(operation, &error).await),
            }
        })
        .await
    }

    /// Fetches pages until the server stops advertising a `next` link.
    pub(super) async fn collect_pages<T>(
        &self,
        operation: &str,
        path: &str,
        filters: &[(&'static str, String)],
    ) -> Result<Vec<T>, GitHubError>
    where
        T: DeserializeOwned + Send,
    {
        let mut collected = Vec::new();
        let mut request = PageRequest::first();

        loop {
            let (items, has_next) = self.fetch_page(operation, path, filters, request).await?;
            collected.extend(items);
            if !has_next {
                return Ok(collected);
            }
            request = request.next();
        }
    }

    async fn map_octocrab_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> GitHubError {
        if classify(error) != FailureKind::RateLimited {
            return map_octocrab_error(operation, error);
        }

        let rate_limit = self.fetch_rate_limit().await.ok();
        let base_message = describe(operation, error);
        let message = match &rate_limit {
            Some(info) => format!(
                "{base_message} (resets at {reset})",
                reset = info.reset_at_rfc3339()
            ),
            None => base_message,
        };

        GitHubError::RateLimitExceeded {
            rate_limit,
            message,
        }
    }
}
