//! Classification of Octocrab failures into [`GitHubError`] values.

use http::StatusCode;

use crate::github::error::GitHubError;

/// Broad category of a failed GitHub call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FailureKind {
    /// Primary or secondary quota exhausted.
    RateLimited,
    /// Token rejected or lacking scope.
    Authentication,
    /// Transport failure before GitHub answered.
    Network,
    /// Any other API or decoding failure.
    Api,
}

/// Categorises `error`.
///
/// `429` is always a rate limit. `403` is a rate limit only when GitHub's
/// message or documentation link says so; otherwise it is treated as an
/// authorisation failure, like `401`.
pub(super) fn classify(error: &octocrab::Error) -> FailureKind {
    match error {
        octocrab::Error::GitHub { source, .. } => match source.status_code {
            StatusCode::TOO_MANY_REQUESTS => FailureKind::RateLimited,
            StatusCode::FORBIDDEN if mentions_rate_limit(source) => FailureKind::RateLimited,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureKind::Authentication,
            _ => FailureKind::Api,
        },
        octocrab::Error::Http { .. }
        | octocrab::Error::Hyper { .. }
        | octocrab::Error::Service { .. } => FailureKind::Network,
        _ => FailureKind::Api,
    }
}

fn mentions_rate_limit(source: &octocrab::GitHubError) -> bool {
    let message = source.message.to_lowercase();
    message.contains("rate limit")
        || message.contains("secondary rate")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"))
}

/// Describes `error` for `operation`, including GitHub's status and message
/// when GitHub answered.
pub(super) fn describe(operation: &str, error: &octocrab::Error) -> String {
    match error {
        octocrab::Error::GitHub { source, .. } => format!(
            "{operation} failed with status {status}: {message}",
            status = source.status_code.as_u16(),
            message = source.message
        ),
        _ => format!("{operation} failed: {error}"),
    }
}

/// Maps `error` without consulting the quota endpoint.
///
/// Rate-limit failures map to [`GitHubError::RateLimitExceeded`] with no
/// quota snapshot; the gateway enriches them when it can.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> GitHubError {
    let message = describe(operation, error);
    match classify(error) {
        FailureKind::RateLimited => GitHubError::RateLimitExceeded {
            rate_limit: None,
            message,
        },
        FailureKind::Authentication => GitHubError::Authentication { message },
        FailureKind::Network => GitHubError::Network { message },
        FailureKind::Api => GitHubError::Api { message },
    }
}
