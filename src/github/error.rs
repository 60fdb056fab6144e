//! Error types exposed by the GitHub access layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubError {
    /// The configured API base could not be parsed.
    #[error("GitHub API base is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if it could be fetched after the failure.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// A repository listing was asked for a visibility it cannot filter by.
    #[error("invalid repository visibility: {value}")]
    InvalidVisibility {
        /// The rejected visibility value.
        value: String,
    },

    /// An organisation listing was requested without an organisation name.
    #[error("organization name cannot be empty")]
    EmptyOrganization,

    /// The run was cancelled while waiting for a request slot or a response.
    #[error("GitHub request cancelled")]
    Cancelled,
}

impl GitHubError {
    /// Returns true when the error reflects run cancellation rather than a
    /// GitHub failure.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
