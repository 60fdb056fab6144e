//! Scripted in-memory gateway and model builders for tests.
//!
//! [`ScriptedGateway`] answers every [`GitHubGateway`] call from data
//! registered up front and records the calls it receives, so tests can
//! assert how many pages or reviews a scan requested.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::GitHubError;
use super::gateway::GitHubGateway;
use super::models::{PullRequest, Repository, RepositoryEvent, Review, ReviewState};
use super::pagination::{ListPage, PageRequest};
use super::rate_limit::RateLimitInfo;
use super::reference::RepositoryReference;
use super::visibility::VisibilityMode;

/// A call received by a [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `pull_request_page` for a repository and page number.
    PullRequestPage {
        /// `owner/name` of the repository.
        repository: String,
        /// Requested page number.
        page: u32,
    },
    /// `pull_request_reviews` for a repository and PR number.
    Reviews {
        /// `owner/name` of the repository.
        repository: String,
        /// Pull request number.
        number: u64,
    },
    /// `user_repositories` with a visibility filter.
    UserRepositories(VisibilityMode),
    /// `organization_repositories` for an organisation.
    OrganizationRepositories {
        /// Organisation login.
        organization: String,
        /// Requested visibility filter.
        visibility: VisibilityMode,
    },
    /// `repository_events` for a repository.
    RepositoryEvents(String),
    /// `public_events`.
    PublicEvents,
    /// `rate_limit`.
    RateLimit,
}

type Scripted<T> = Result<T, GitHubError>;

/// Gateway that serves pre-registered responses.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    pull_request_pages: HashMap<String, Vec<Scripted<Vec<PullRequest>>>>,
    reviews: HashMap<(String, u64), Scripted<Vec<Review>>>,
    user_repositories: Option<Scripted<Vec<Repository>>>,
    organization_repositories: HashMap<String, Scripted<Vec<Repository>>>,
    repository_events: HashMap<String, Scripted<Vec<RepositoryEvent>>>,
    public_events: Vec<RepositoryEvent>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedGateway {
    /// Creates a gateway with no scripted data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the pages of closed pull requests for `repository`.
    ///
    /// Every page except the last advertises a following page.
    #[must_use]
    pub fn with_pull_request_pages(
        mut self,
        repository: &str,
        pages: Vec<Vec<PullRequest>>,
    ) -> Self {
        let entry = self
            .pull_request_pages
            .entry(repository.to_owned())
            .or_default();
        entry.extend(pages.into_iter().map(Ok));
        self
    }

    /// Registers a failing page after any pages already registered.
    #[must_use]
    pub fn with_pull_request_error(mut self, repository: &str, error: GitHubError) -> Self {
        self.pull_request_pages
            .entry(repository.to_owned())
            .or_default()
            .push(Err(error));
        self
    }

    /// Registers the reviews of one pull request.
    #[must_use]
    pub fn with_reviews(mut self, repository: &str, number: u64, reviews: Vec<Review>) -> Self {
        self.reviews
            .insert((repository.to_owned(), number), Ok(reviews));
        self
    }

    /// Makes the review listing of one pull request fail.
    #[must_use]
    pub fn with_review_error(mut self, repository: &str, number: u64, error: GitHubError) -> Self {
        self.reviews.insert((repository.to_owned(), number), Err(error));
        self
    }

    /// Registers the authenticated user's repositories.
    #[must_use]
    pub fn with_user_repositories(mut self, repositories: Scripted<Vec<Repository>>) -> Self {
        self.user_repositories = Some(repositories);
        self
    }

    /// Registers the repositories of an organisation.
    #[must_use]
    pub fn with_organization_repositories(
        mut self,
        organization: &str,
        repositories: Scripted<Vec<Repository>>,
    ) -> Self {
        self.organization_repositories
            .insert(organization.to_owned(), repositories);
        self
    }

    /// Registers the events of a repository, newest first.
    #[must_use]
    pub fn with_repository_events(
        mut self,
        repository: &str,
        events: Scripted<Vec<RepositoryEvent>>,
    ) -> Self {
        self.repository_events
            .insert(repository.to_owned(), events);
        self
    }

    /// Registers the public event feed.
    #[must_use]
    pub fn with_public_events(mut self, events: Vec<RepositoryEvent>) -> Self {
        self.public_events = events;
        self
    }

    /// Returns every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock_calls().clone()
    }

    /// Number of pull request pages requested for `repository`.
    #[must_use]
    pub fn pages_requested(&self, repository: &str) -> usize {
        self.lock_calls()
            .iter()
            .filter(|call| {
                matches!(call, GatewayCall::PullRequestPage { repository: name, .. } if name == repository)
            })
            .count()
    }

    /// Pull request numbers whose reviews were requested for `repository`.
    #[must_use]
    pub fn review_requests(&self, repository: &str) -> Vec<u64> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Reviews {
                    repository: name,
                    number,
                } if name == repository => Some(*number),
                _ => None,
            })
            .collect()
    }

    /// Repositories whose events were requested.
    #[must_use]
    pub fn event_requests(&self) -> Vec<String> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                GatewayCall::RepositoryEvents(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GatewayCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<GatewayCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl GitHubGateway for ScriptedGateway {
    async fn pull_request_page(
        &self,
        repository: &RepositoryReference,
        page: PageRequest,
    ) -> Result<ListPage<PullRequest>, GitHubError> {
        let key = repository.to_string();
        self.record(GatewayCall::PullRequestPage {
            repository: key.clone(),
            page: page.page(),
        });

        let Some(pages) = self.pull_request_pages.get(&key) else {
            return Ok(ListPage::last(Vec::new(), page.page()));
        };
        let index = usize::try_from(page.page().saturating_sub(1)).unwrap_or(usize::MAX);
        match pages.get(index) {
            Some(Ok(items)) => {
                let has_next = index.saturating_add(1) < pages.len();
                Ok(ListPage {
                    items: items.clone(),
                    page: page.page(),
                    has_next,
                })
            }
            Some(Err(error)) => Err(error.clone()),
            None => Ok(ListPage::last(Vec::new(), page.page())),
        }
    }

    async fn pull_request_reviews(
        &self,
        repository: &RepositoryReference,
        number: u64,
    ) -> Result<Vec<Review>, GitHubError> {
        let key = repository.to_string();
        self.record(GatewayCall::Reviews {
            repository: key.clone(),
            number,
        });
        self.reviews
            .get(&(key, number))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn user_repositories(
        &self,
        visibility: VisibilityMode,
    ) -> Result<Vec<Repository>, GitHubError> {
        self.record(GatewayCall::UserRepositories(visibility));
        self.user_repositories
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn organization_repositories(
        &self,
        organization: &str,
        visibility: VisibilityMode,
    ) -> Result<Vec<Repository>, GitHubError> {
        self.record(GatewayCall::OrganizationRepositories {
            organization: organization.to_owned(),
            visibility,
        });
        self.organization_repositories
            .get(organization)
            .cloned()
            .unwrap_or_else(|| {
                Err(GitHubError::Api {
                    message: format!("list organization repositories failed with status 404 Not Found: {organization}"),
                })
            })
    }

    async fn repository_events(
        &self,
        repository: &RepositoryReference,
    ) -> Result<Vec<RepositoryEvent>, GitHubError> {
        let key = repository.to_string();
        self.record(GatewayCall::RepositoryEvents(key.clone()));
        self.repository_events
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn public_events(&self) -> Result<Vec<RepositoryEvent>, GitHubError> {
        self.record(GatewayCall::PublicEvents);
        Ok(self.public_events.clone())
    }

    async fn rate_limit(&self) -> Result<RateLimitInfo, GitHubError> {
        self.record(GatewayCall::RateLimit);
        Ok(RateLimitInfo::new(5000, 5000, 0))
    }
}

/// Builds a pull request merged at `merged_at` and last updated at
/// `updated_at`.
#[must_use]
pub fn pull_request(
    number: u64,
    updated_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
) -> PullRequest {
    PullRequest {
        number,
        title: format!("Change #{number}"),
        author: Some("octocat".to_owned()),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        created_at: updated_at,
        updated_at,
        merged_at,
    }
}

/// Builds a pull request merged at `merged_at`, updated at the same time.
#[must_use]
pub fn merged_pull_request(number: u64, merged_at: DateTime<Utc>) -> PullRequest {
    pull_request(number, merged_at, Some(merged_at))
}

/// Builds a review submitted by `reviewer` in `state`.
#[must_use]
pub fn review(reviewer: &str, state: ReviewState) -> Review {
    Review {
        reviewer: Some(reviewer.to_owned()),
        state,
        submitted_at: None,
    }
}

/// Builds a repository summary.
#[must_use]
pub fn repository(
    full_name: &str,
    private: bool,
    created_at: Option<DateTime<Utc>>,
) -> Repository {
    let name = full_name
        .rsplit_once('/')
        .map_or(full_name, |(_, name)| name)
        .to_owned();
    Repository {
        name,
        full_name: full_name.to_owned(),
        private,
        created_at,
    }
}

/// Builds a repository event of `kind`.
#[must_use]
pub fn event(kind: &str, created_at: Option<DateTime<Utc>>) -> RepositoryEvent {
    RepositoryEvent {
        kind: kind.to_owned(),
        repository: None,
        created_at,
    }
}
