//! Data models for pull requests, reviews, repositories and events.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Event type GitHub records when a repository is made public.
pub const PUBLIC_EVENT_TYPE: &str = "PublicEvent";

/// Pull request fields needed by the compliance scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: String,
    /// Author login if present.
    pub author: Option<String>,
    /// HTML URL for displaying to a user.
    pub url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time; list endpoints are sorted by this field.
    pub updated_at: DateTime<Utc>,
    /// Merge time, absent for pull requests closed without merging.
    pub merged_at: Option<DateTime<Utc>>,
}

/// State of a submitted pull request review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// The reviewer approved the changes.
    Approved,
    /// The reviewer requested changes.
    ChangesRequested,
    /// The reviewer left comments without a verdict.
    Commented,
    /// The review was dismissed.
    Dismissed,
    /// The review has not been submitted.
    Pending,
    /// Any other value GitHub reports, including an empty state.
    Other(String),
}

impl ReviewState {
    /// Maps the API spelling onto a review state.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        match value {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            "COMMENTED" => Self::Commented,
            "DISMISSED" => Self::Dismissed,
            "PENDING" => Self::Pending,
            other => Self::Other(other.to_owned()),
        }
    }

    /// API spelling of the state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
            Self::Commented => "COMMENTED",
            Self::Dismissed => "DISMISSED",
            Self::Pending => "PENDING",
            Self::Other(other) => other.as_str(),
        }
    }
}

/// A single review submitted on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Reviewer login if present.
    pub reviewer: Option<String>,
    /// Review state.
    pub state: ReviewState,
    /// Submission time.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Repository listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Repository name without owner.
    pub name: String,
    /// `owner/name` identifier.
    pub full_name: String,
    /// Whether the repository is currently private.
    pub private: bool,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

/// Activity event recorded against a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEvent {
    /// Event type such as `PushEvent` or `PublicEvent`.
    pub kind: String,
    /// `owner/name` of the repository the event belongs to.
    pub repository: Option<String>,
    /// When the event happened.
    pub created_at: Option<DateTime<Utc>>,
}

impl RepositoryEvent {
    /// Returns true when the event records the repository becoming public.
    #[must_use]
    pub fn is_publication(&self) -> bool {
        self.kind == PUBLIC_EVENT_TYPE
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) html_url: Option<String>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
    pub(super) merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReview {
    pub(super) user: Option<ApiUser>,
    pub(super) state: Option<String>,
    pub(super) submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) name: String,
    pub(super) full_name: String,
    #[serde(default)]
    pub(super) private: bool,
    pub(super) created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiEventRepository {
    pub(super) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiEvent {
    #[serde(rename = "type")]
    pub(super) kind: Option<String>,
    pub(super) repo: Option<ApiEventRepository>,
    pub(super) created_at: Option<DateTime<Utc>>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            author: value.user.and_then(|user| user.login),
            url: value.html_url.unwrap_or_default(),
            created_at: value.created_at,
            updated_at: value.updated_at,
            merged_at: value.merged_at,
        }
    }
}

impl From<ApiReview> for Review {
    fn from(value: ApiReview) -> Self {
        Self {
            reviewer: value.user.and_then(|user| user.login),
            state: ReviewState::from_api(value.state.as_deref().unwrap_or_default()),
            submitted_at: value.submitted_at,
        }
    }
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        Self {
            name: value.name,
            full_name: value.full_name,
            private: value.private,
            created_at: value.created_at,
        }
    }
}

impl From<ApiEvent> for RepositoryEvent {
    fn from(value: ApiEvent) -> Self {
        Self {
            kind: value.kind.unwrap_or_default(),
            repository: value.repo.and_then(|repo| repo.name),
            created_at: value.created_at,
        }
    }
}
