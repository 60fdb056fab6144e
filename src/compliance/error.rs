//! Errors recorded against individual scan results.

use thiserror::Error;

use crate::github::GitHubError;

/// Failure recorded in a [`ScanResult`](super::ScanResult).
///
/// A result carrying an error has an unapproved list that must not be
/// trusted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    /// The repository identifier is not of the form `owner/name`.
    #[error("invalid repository format, expected 'owner/repo': {input}")]
    InvalidRepository {
        /// Identifier as configured.
        input: String,
    },

    /// Listing pull requests failed.
    #[error("error getting pull requests: {0}")]
    PullRequests(#[source] GitHubError),

    /// Listing the reviews of a pull request failed.
    #[error("error checking approval of PR #{number}: {source}")]
    Reviews {
        /// Pull request whose reviews could not be read.
        number: u64,
        /// Underlying GitHub failure.
        source: GitHubError,
    },

    /// Listing an organisation's repositories failed.
    #[error("failed to fetch organization repositories for {organization}: {source}")]
    OrganizationRepositories {
        /// Organisation login.
        organization: String,
        /// Underlying GitHub failure.
        source: GitHubError,
    },

    /// Listing the authenticated user's repositories failed.
    #[error("failed to fetch user repositories: {0}")]
    UserRepositories(#[source] GitHubError),

    /// The repository visibility setting is not recognised.
    #[error("invalid repository visibility setting: {value}")]
    InvalidVisibility {
        /// Setting as configured.
        value: String,
    },
}

impl ScanError {
    /// Returns true when the scan stopped because the run was cancelled.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        match self {
            Self::PullRequests(source)
            | Self::Reviews { source, .. }
            | Self::OrganizationRepositories { source, .. }
            | Self::UserRepositories(source) => source.is_cancellation(),
            Self::InvalidRepository { .. } | Self::InvalidVisibility { .. } => false,
        }
    }
}
