//! [`GitHubGateway`] implementation for [`OctocrabGateway`].

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::models::{
    ApiEvent, ApiPullRequest, ApiRepository, ApiReview, PullRequest, Repository,
    RepositoryEvent, Review,
};
use crate::github::pagination::{ListPage, PageRequest};
use crate::github::rate_limit::RateLimitInfo;
use crate::github::reference::RepositoryReference;
use crate::github::visibility::VisibilityMode;

use super::GitHubGateway;
use super::rate_limited::OctocrabGateway;

fn visibility_filter(visibility: VisibilityMode) -> Result<&'static str, GitHubError> {
    visibility
        .api_filter()
        .ok_or_else(|| GitHubError::InvalidVisibility {
            value: visibility.as_str().to_owned(),
        })
}

#[async_trait]
impl GitHubGateway for OctocrabGateway {
    async fn pull_request_page(
        &self,
        repository: &RepositoryReference,
        page: PageRequest,
    ) -> Result<ListPage<PullRequest>, GitHubError> {
        let filters = [
            ("state", "closed".to_owned()),
            ("sort", "updated".to_owned()),
            ("direction", "desc".to_owned()),
        ];
        let (api_items, has_next) = self
            .fetch_page::<ApiPullRequest>(
                "list pull requests",
                &repository.pulls_path(),
                &filters,
                page,
            )
            .await?;
        let items = api_items.into_iter().map(PullRequest::from).collect();

        Ok(ListPage {
            items,
            page: page.page(),
            has_next,
        })
    }

    async fn pull_request_reviews(
        &self,
        repository: &RepositoryReference,
        number: u64,
    ) -> Result<Vec<Review>, GitHubError> {
        let reviews = self
            .collect_pages::<ApiReview>("list reviews", &repository.reviews_path(number), &[])
            .await?;
        Ok(reviews.into_iter().map(Review::from).collect())
    }

    async fn user_repositories(
        &self,
        visibility: VisibilityMode,
    ) -> Result<Vec<Repository>, GitHubError> {
        let filter = visibility_filter(visibility)?;
        let repositories = self
            .collect_pages::<ApiRepository>(
                "list user repositories",
                "/user/repos",
                &[("visibility", filter.to_owned())],
            )
            .await?;
        Ok(repositories.into_iter().map(Repository::from).collect())
    }

    async fn organization_repositories(
        &self,
        organization: &str,
        visibility: VisibilityMode,
    ) -> Result<Vec<Repository>, GitHubError> {
        if organization.trim().is_empty() {
            return Err(GitHubError::EmptyOrganization);
        }
        let filter = visibility_filter(visibility)?;
        let repositories = self
            .collect_pages::<ApiRepository>(
                "list organization repositories",
                &format!("/orgs/{organization}/repos"),
                &[("type", filter.to_owned())],
            )
            .await?;
        Ok(repositories.into_iter().map(Repository::from).collect())
    }

    async fn repository_events(
        &self,
        repository: &RepositoryReference,
    ) -> Result<Vec<RepositoryEvent>, GitHubError> {
        let events = self
            .collect_pages::<ApiEvent>("list repository events", &repository.events_path(), &[])
            .await?;
        Ok(events.into_iter().map(RepositoryEvent::from).collect())
    }

    async fn public_events(&self) -> Result<Vec<RepositoryEvent>, GitHubError> {
        let events = self
            .collect_pages::<ApiEvent>("list public events", "/events", &[])
            .await?;
        Ok(events.into_iter().map(RepositoryEvent::from).collect())
    }

    async fn rate_limit(&self) -> Result<RateLimitInfo, GitHubError> {
        self.fetch_rate_limit().await
    }
}
