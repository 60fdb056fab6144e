//! Detection of repositories that recently became public.
//!
//! A public repository is a finding when it was created inside the check
//! window, or when its event history shows a `PublicEvent` inside the
//! window. Findings are reported as `org/name` strings.

use crate::compliance::ScanWindow;
use crate::github::{GitHubError, GitHubGateway, Repository, RepositoryReference, VisibilityMode};

/// Scans organisations for recently public repositories.
pub struct VisibilityScanner<'client, G: ?Sized> {
    gateway: &'client G,
}

impl<'client, G> VisibilityScanner<'client, G>
where
    G: GitHubGateway + ?Sized,
{
    /// Creates a scanner backed by `gateway`.
    #[must_use]
    pub const fn new(gateway: &'client G) -> Self {
        Self { gateway }
    }

    /// Checks every organisation in order.
    ///
    /// Organisations that cannot be listed are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Cancelled`] when the run is cancelled; no other
    /// failure escapes.
    pub async fn run(
        &self,
        organizations: &[String],
        mode: VisibilityMode,
        window: &ScanWindow,
    ) -> Result<Vec<String>, GitHubError> {
        let mut findings = Vec::new();
        for organization in organizations {
            match self.check_organization(organization, mode, window).await {
                Ok(found) => findings.extend(found),
                Err(error) if error.is_cancellation() => return Err(error),
                Err(error) => {
                    tracing::warn!("Error checking organization {organization}: {error}");
                }
            }
        }
        Ok(findings)
    }

    /// Lists `organization`'s repositories and returns those that became
    /// public inside `window`.
    ///
    /// `specific` and `public-only` list public repositories; `all` and
    /// `private-only` list with their own filter. The listing is filtered
    /// again by mode, then only repositories that are currently public are
    /// checked, so `private-only` never yields a finding. Event lookups that
    /// fail are logged and the repository is skipped.
    ///
    /// # Errors
    ///
    /// Returns the listing error when the organisation's repositories cannot
    /// be fetched, or [`GitHubError::Cancelled`] when the run is cancelled.
    pub async fn check_organization(
        &self,
        organization: &str,
        mode: VisibilityMode,
        window: &ScanWindow,
    ) -> Result<Vec<String>, GitHubError> {
        tracing::info!(
            "Checking for public repositories in {organization} organization with visibility {mode} since {}",
            window.cutoff().to_rfc3339()
        );

        let filter = match mode {
            VisibilityMode::Specific | VisibilityMode::PublicOnly => VisibilityMode::PublicOnly,
            VisibilityMode::All | VisibilityMode::PrivateOnly => mode,
        };
        let repositories = self
            .gateway
            .organization_repositories(organization, filter)
            .await?;

        let mut findings = Vec::new();
        let candidates = repositories
            .iter()
            .filter(|repo| matches_mode(mode, repo))
            .filter(|repo| !repo.private);
        for repository in candidates {
            let reference = RepositoryReference::new(organization, repository.name.as_str());
            match self.became_public(&reference, repository, window).await {
                Ok(true) => findings.push(reference.to_string()),
                Ok(false) => {}
                Err(error) if error.is_cancellation() => return Err(error),
                Err(error) => {
                    tracing::warn!("Error checking events for {reference}: {error}");
                }
            }
        }
        Ok(findings)
    }

    /// Returns true when `owner/name` is public and became so inside
    /// `window`. A repository that is not listed as public yields false.
    ///
    /// # Errors
    ///
    /// Returns the listing or event error when either lookup fails.
    pub async fn check_repository(
        &self,
        owner: &str,
        name: &str,
        window: &ScanWindow,
    ) -> Result<bool, GitHubError> {
        tracing::info!(
            "Checking repository {owner}/{name} for visibility changes since {}",
            window.cutoff().to_rfc3339()
        );

        let repositories = self
            .gateway
            .organization_repositories(owner, VisibilityMode::PublicOnly)
            .await?;
        let Some(repository) = repositories
            .iter()
            .find(|repo| repo.name == name && !repo.private)
        else {
            return Ok(false);
        };

        let reference = RepositoryReference::new(owner, name);
        self.became_public(&reference, repository, window).await
    }

    async fn became_public(
        &self,
        reference: &RepositoryReference,
        repository: &Repository,
        window: &ScanWindow,
    ) -> Result<bool, GitHubError> {
        if repository
            .created_at
            .is_some_and(|created_at| window.contains(created_at))
        {
            return Ok(true);
        }

        let events = self.gateway.repository_events(reference).await?;
        for event in &events {
            if event
                .created_at
                .is_some_and(|created_at| !window.contains(created_at))
            {
                return Ok(false);
            }
            if event.is_publication() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Client-side counterpart of the listing filter: `private-only` keeps
/// private repositories, `public-only` and `specific` keep public ones.
const fn matches_mode(mode: VisibilityMode, repository: &Repository) -> bool {
    match mode {
        VisibilityMode::PrivateOnly => repository.private,
        VisibilityMode::Specific | VisibilityMode::PublicOnly => !repository.private,
        VisibilityMode::All => true,
    }
}

#[cfg(test)]
mod tests;
