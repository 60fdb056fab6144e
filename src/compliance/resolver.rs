//! Resolution of the configured repository selection into identifiers.

use std::collections::BTreeSet;

use crate::github::{GitHubGateway, Repository, VisibilityMode};

use super::error::ScanError;
use super::result::ScanResult;

/// Label used when the visibility setting itself is invalid.
pub const ALL_REPOSITORIES_LABEL: &str = "all-repositories";

/// Label used when listing the authenticated user's repositories fails.
pub const USER_REPOSITORIES_LABEL: &str = "user-repositories";

/// Which repositories the compliance scan should cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySelection {
    /// `specific`, `all`, `public-only` or `private-only`.
    pub visibility: String,
    /// Organisation to list for non-specific modes; the authenticated user's
    /// repositories are listed when absent.
    pub organization: Option<String>,
    /// Identifiers scanned in `specific` mode.
    pub repositories: Vec<String>,
    /// Full names dropped in non-specific modes.
    pub excluded: Vec<String>,
}

/// Resolution failure, reported as a single error-bearing result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    /// Placeholder label such as `org:acme`.
    pub label: String,
    /// Cause of the failure.
    pub error: ScanError,
}

impl From<ResolutionFailure> for ScanResult {
    fn from(failure: ResolutionFailure) -> Self {
        Self::failed(failure.label, failure.error)
    }
}

/// Resolves a [`RepositorySelection`] through the gateway.
pub struct RepositorySetResolver<'client, G: ?Sized> {
    gateway: &'client G,
}

impl<'client, G> RepositorySetResolver<'client, G>
where
    G: GitHubGateway + ?Sized,
{
    /// Creates a resolver backed by `gateway`.
    #[must_use]
    pub const fn new(gateway: &'client G) -> Self {
        Self { gateway }
    }

    /// Produces the ordered list of `owner/name` identifiers to scan.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionFailure`] labelled `all-repositories` for an
    /// unknown visibility, `org:<org>` when the organisation listing fails
    /// and `user-repositories` when the user listing fails. No partial list
    /// is ever returned.
    pub async fn resolve(
        &self,
        selection: &RepositorySelection,
    ) -> Result<Vec<String>, ResolutionFailure> {
        let mode: VisibilityMode =
            selection
                .visibility
                .parse()
                .map_err(|_| ResolutionFailure {
                    label: ALL_REPOSITORIES_LABEL.to_owned(),
                    error: ScanError::InvalidVisibility {
                        value: selection.visibility.clone(),
                    },
                })?;

        if mode == VisibilityMode::Specific {
            return Ok(selection.repositories.clone());
        }

        let repositories = self.list(mode, selection.organization.as_deref()).await?;
        Ok(apply_exclusions(repositories, &selection.excluded))
    }

    async fn list(
        &self,
        mode: VisibilityMode,
        scope: Option<&str>,
    ) -> Result<Vec<Repository>, ResolutionFailure> {
        if let Some(organization) = scope.filter(|org| !org.is_empty()) {
            tracing::info!(
                "Fetching repositories for organization '{organization}' with visibility '{mode}'..."
            );
            let repositories = self
                .gateway
                .organization_repositories(organization, mode)
                .await
                .map_err(|source| ResolutionFailure {
                    label: format!("org:{organization}"),
                    error: ScanError::OrganizationRepositories {
                        organization: organization.to_owned(),
                        source,
                    },
                })?;
            tracing::info!(
                "Found {} repositories for organization '{organization}' with visibility '{mode}'",
                repositories.len()
            );
            return Ok(repositories);
        }

        tracing::info!("Fetching repositories for authenticated user with visibility '{mode}'...");
        let repositories = self
            .gateway
            .user_repositories(mode)
            .await
            .map_err(|source| ResolutionFailure {
                label: USER_REPOSITORIES_LABEL.to_owned(),
                error: ScanError::UserRepositories(source),
            })?;
        tracing::info!(
            "Found {} repositories for authenticated user with visibility '{mode}'",
            repositories.len()
        );
        Ok(repositories)
    }
}

fn apply_exclusions(repositories: Vec<Repository>, excluded: &[String]) -> Vec<String> {
    let excluded_names: BTreeSet<&str> = excluded.iter().map(String::as_str).collect();

    let kept: Vec<String> = repositories
        .into_iter()
        .filter_map(|repository| {
            if excluded_names.contains(repository.full_name.as_str()) {
                tracing::info!(
                    "Excluding repository: {} (found in excluded repositories list)",
                    repository.full_name
                );
                None
            } else {
                Some(repository.full_name)
            }
        })
        .collect();

    if !excluded.is_empty() {
        tracing::info!(
            "After applying exclusions: processing {} repositories",
            kept.len()
        );
    }
    kept
}
