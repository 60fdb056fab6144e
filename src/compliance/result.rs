//! Per-repository scan results.

use crate::github::PullRequest;

use super::error::ScanError;

/// A merged pull request that lacks an effective approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnapprovedPullRequest {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Author login, empty when GitHub did not report one.
    pub author: String,
    /// Browser URL of the pull request.
    pub url: String,
}

impl From<&PullRequest> for UnapprovedPullRequest {
    fn from(pull_request: &PullRequest) -> Self {
        Self {
            number: pull_request.number,
            title: pull_request.title.clone(),
            author: pull_request.author.clone().unwrap_or_default(),
            url: pull_request.url.clone(),
        }
    }
}

/// Outcome of scanning one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Identifier that was scanned, or a placeholder label for failures
    /// that happened before any repository was known.
    pub repository: String,
    /// Merged pull requests without an effective approval.
    pub unapproved: Vec<UnapprovedPullRequest>,
    /// Set when the scan failed; `unapproved` is then incomplete.
    pub error: Option<ScanError>,
}

impl ScanResult {
    /// A completed scan.
    #[must_use]
    pub fn completed(repository: impl Into<String>, unapproved: Vec<UnapprovedPullRequest>) -> Self {
        Self {
            repository: repository.into(),
            unapproved,
            error: None,
        }
    }

    /// A failed scan.
    #[must_use]
    pub fn failed(repository: impl Into<String>, error: ScanError) -> Self {
        Self {
            repository: repository.into(),
            unapproved: Vec::new(),
            error: Some(error),
        }
    }

    /// Returns true when the scan completed and found nothing unapproved.
    #[must_use]
    pub const fn is_compliant(&self) -> bool {
        self.error.is_none() && self.unapproved.is_empty()
    }

    /// Returns true when the scan was cut short by cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.error.as_ref().is_some_and(ScanError::is_cancellation)
    }
}
