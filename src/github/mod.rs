//! GitHub access layer.
//!
//! This module wraps Octocrab behind the [`GitHubGateway`] capability trait.
//! Every request issued by [`OctocrabGateway`] is throttled to a fixed rate
//! and followed by a best-effort quota check. Errors are mapped into
//! [`GitHubError`] so that callers can record failures per repository without
//! exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod reference;
pub mod throttle;
pub mod token;
pub mod visibility;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::GitHubError;
pub use gateway::{GitHubGateway, OctocrabGateway};
pub use models::{
    PUBLIC_EVENT_TYPE, PullRequest, Repository, RepositoryEvent, Review, ReviewState,
};
pub use pagination::{ListPage, PageRequest};
pub use rate_limit::RateLimitInfo;
pub use reference::RepositoryReference;
pub use throttle::RequestThrottle;
pub use token::PersonalAccessToken;
pub use visibility::{UnknownVisibility, VisibilityMode};

#[cfg(test)]
pub use gateway::MockGitHubGateway;
