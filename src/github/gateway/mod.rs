//! Gateways for talking to the GitHub REST API.
//!
//! [`GitHubGateway`] is the capability the scanners depend on. The
//! production implementation, [`OctocrabGateway`], funnels every request
//! through a token bucket and checks the remaining quota afterwards; tests
//! substitute a mock or the scripted gateway from `test_support`.

mod client;
mod endpoints;
mod error_mapping;
mod rate_limited;

pub use rate_limited::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::models::{PullRequest, Repository, RepositoryEvent, Review};
use crate::github::pagination::{ListPage, PageRequest};
use crate::github::rate_limit::RateLimitInfo;
use crate::github::reference::RepositoryReference;
use crate::github::visibility::VisibilityMode;

/// GitHub operations needed by the compliance and visibility scanners.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// Fetch one page of closed pull requests, most recently updated first.
    async fn pull_request_page(
        &self,
        repository: &RepositoryReference,
        page: PageRequest,
    ) -> Result<ListPage<PullRequest>, GitHubError>;

    /// Fetch every review submitted on a pull request, oldest first.
    async fn pull_request_reviews(
        &self,
        repository: &RepositoryReference,
        number: u64,
    ) -> Result<Vec<Review>, GitHubError>;

    /// List the authenticated user's repositories with the given visibility.
    async fn user_repositories(
        &self,
        visibility: VisibilityMode,
    ) -> Result<Vec<Repository>, GitHubError>;

    /// List an organisation's repositories with the given visibility.
    async fn organization_repositories(
        &self,
        organization: &str,
        visibility: VisibilityMode,
    ) -> Result<Vec<Repository>, GitHubError>;

    /// List a repository's events, newest first.
    async fn repository_events(
        &self,
        repository: &RepositoryReference,
    ) -> Result<Vec<RepositoryEvent>, GitHubError>;

    /// List recent public events across GitHub, newest first.
    async fn public_events(&self) -> Result<Vec<RepositoryEvent>, GitHubError>;

    /// Read the current API quota.
    async fn rate_limit(&self) -> Result<RateLimitInfo, GitHubError>;
}
