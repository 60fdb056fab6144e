//! Octocrab client construction.

use http::Uri;
use octocrab::Octocrab;
use url::Url;

use crate::github::error::GitHubError;
use crate::github::token::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Normalises `api_base` into a URI Octocrab accepts.
///
/// Only `http` and `https` bases are allowed. A trailing slash is removed so
/// that joined paths never contain `//`.
pub(super) fn api_base_uri(api_base: &str) -> Result<Uri, GitHubError> {
    let parsed = Url::parse(api_base.trim())
        .map_err(|error| GitHubError::InvalidUrl(format!("{api_base}: {error}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GitHubError::InvalidUrl(format!(
            "{api_base}: unsupported scheme '{}'",
            parsed.scheme()
        )));
    }

    parsed
        .as_str()
        .trim_end_matches('/')
        .parse::<Uri>()
        .map_err(|error| GitHubError::InvalidUrl(format!("{api_base}: {error}")))
}

/// Builds an authenticated Octocrab client for `api_base`.
///
/// # Errors
///
/// Returns `GitHubError::InvalidUrl` when the base is not an HTTP(S) URL and
/// `GitHubError::Api` when Octocrab rejects the configuration.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, GitHubError> {
    let base_uri = api_base_uri(api_base)?;
    tracing::debug!("Using GitHub API base {base_uri}");

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| GitHubError::InvalidUrl(format!("{api_base}: {error}")))?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
