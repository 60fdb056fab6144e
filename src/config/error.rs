//! Configuration validation errors.

use std::fmt;

use thiserror::Error;

/// Monitor a configuration problem belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monitor {
    /// Pull request approval checker.
    PrChecker,
    /// Repository visibility checker.
    Visibility,
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PrChecker => "pr_checker",
            Self::Visibility => "repo_visibility",
        })
    }
}

/// Fatal configuration problems, detected before any API call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No GitHub token in configuration or `GITHUB_TOKEN`.
    #[error("GitHub token is required: set it in the config file or the GITHUB_TOKEN environment variable")]
    MissingToken,

    /// A monitor's visibility setting is not recognised.
    #[error(
        "invalid repository visibility for {monitor} monitor: {value}. Must be one of: all, public-only, private-only, specific"
    )]
    InvalidVisibility {
        /// Monitor whose setting is invalid.
        monitor: Monitor,
        /// Value as configured.
        value: String,
    },

    /// `specific` mode with an empty repository list.
    #[error("at least one repository must be specified for the PR checker when repo visibility is 'specific'")]
    MissingRepositories,

    /// A time window of zero or fewer hours.
    #[error("time window for {monitor} monitor must be greater than 0")]
    NonPositiveWindow {
        /// Monitor whose window is invalid.
        monitor: Monitor,
    },

    /// The visibility checker is enabled without organisations.
    #[error("at least one organization must be specified for the repo_visibility monitor")]
    MissingOrganizations,

    /// Layered configuration could not be loaded or merged.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader error message.
        message: String,
    },
}
