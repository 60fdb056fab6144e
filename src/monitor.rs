//! One monitoring run: the PR checker followed by the visibility checker.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::compliance::{PullRequestScanner, RepositorySetResolver, ScanResult, ScanWindow};
use crate::config::{ConfigError, PrCheckerSettings, ValidatedConfig, VisibilitySettings};
use crate::github::{GitHubError, GitHubGateway};
use crate::report::ReportError;
use crate::visibility::VisibilityScanner;

/// Results of both checkers.
///
/// `None` means the checker was disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Per-repository PR checker results.
    pub pull_requests: Option<Vec<ScanResult>>,
    /// `org/name` identifiers that recently became public.
    pub recently_public: Option<Vec<String>>,
}

impl RunOutcome {
    /// Whether any repository scan failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.pull_requests
            .iter()
            .flatten()
            .any(|result| result.error.is_some())
    }

    /// Whether any unapproved pull request or newly public repository was
    /// found.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        let unapproved = self
            .pull_requests
            .iter()
            .flatten()
            .any(|result| !result.unapproved.is_empty());
        let public = self
            .recently_public
            .as_ref()
            .is_some_and(|found| !found.is_empty());
        unapproved || public
    }

    /// Number of repositories the PR checker reported on.
    #[must_use]
    pub fn repositories_checked(&self) -> usize {
        self.pull_requests.as_ref().map_or(0, Vec::len)
    }

    /// Total unapproved pull requests across all repositories.
    #[must_use]
    pub fn unapproved_count(&self) -> usize {
        self.pull_requests
            .iter()
            .flatten()
            .map(|result| result.unapproved.len())
            .sum()
    }

    /// Number of failed repository scans.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.pull_requests
            .iter()
            .flatten()
            .filter(|result| result.error.is_some())
            .count()
    }
}

/// Failures that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The GitHub client could not be built.
    #[error("GitHub client error: {0}")]
    Gateway(#[from] GitHubError),

    /// The run was interrupted.
    #[error("run cancelled")]
    Cancelled,

    /// Writing the report to standard output failed.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Runs every enabled checker against `gateway` with windows ending at
/// `now`.
///
/// Repository-level failures are recorded in the outcome.
///
/// # Errors
///
/// Returns [`RunError::Cancelled`] when cancellation interrupts any request.
pub async fn run<G>(
    gateway: &G,
    config: &ValidatedConfig,
    now: DateTime<Utc>,
) -> Result<RunOutcome, RunError>
where
    G: GitHubGateway + ?Sized,
{
    let pull_requests = match config.pr_checker.as_ref() {
        Some(settings) => Some(check_pull_requests(gateway, settings, now).await?),
        None => {
            tracing::info!("PR checker is disabled");
            None
        }
    };

    let recently_public = match config.visibility.as_ref() {
        Some(settings) => Some(check_visibility(gateway, settings, now).await?),
        None => {
            tracing::info!("Repository visibility checker is disabled");
            None
        }
    };

    Ok(RunOutcome {
        pull_requests,
        recently_public,
    })
}

async fn check_pull_requests<G>(
    gateway: &G,
    settings: &PrCheckerSettings,
    now: DateTime<Utc>,
) -> Result<Vec<ScanResult>, RunError>
where
    G: GitHubGateway + ?Sized,
{
    tracing::info!("Running PR checker...");
    let repositories = match RepositorySetResolver::new(gateway)
        .resolve(&settings.selection)
        .await
    {
        Ok(repositories) => repositories,
        Err(failure) if failure.error.is_cancellation() => return Err(RunError::Cancelled),
        Err(failure) => {
            tracing::error!("Failed to resolve repositories: {}", failure.error);
            return Ok(vec![ScanResult::from(failure)]);
        }
    };

    let window = ScanWindow::hours_before(now, settings.window_hours);
    PullRequestScanner::new(gateway)
        .with_debug_logging(settings.debug_logging)
        .scan_all(&repositories, &window)
        .await
        .map_err(|_| RunError::Cancelled)
}

async fn check_visibility<G>(
    gateway: &G,
    settings: &VisibilitySettings,
    now: DateTime<Utc>,
) -> Result<Vec<String>, RunError>
where
    G: GitHubGateway + ?Sized,
{
    tracing::info!("Running repository visibility checker...");
    let window = ScanWindow::hours_before(now, settings.check_window_hours);
    VisibilityScanner::new(gateway)
        .run(&settings.organizations, settings.mode, &window)
        .await
        .map_err(|_| RunError::Cancelled)
}
