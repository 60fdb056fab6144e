//! Pull request compliance scanning for a single repository.

use crate::github::{GitHubGateway, PageRequest, PullRequest, RepositoryReference};

use super::error::ScanError;
use super::result::{ScanResult, UnapprovedPullRequest};
use super::verdict::{ApprovalVerdict, evaluate_reviews};
use super::window::{Disposition, ScanWindow, WindowPolicy, WindowedPagination};

/// Counters reported when a repository scan completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Pull requests examined, including the one that stopped the scan.
    pub examined: u32,
    /// Pull requests merged inside the window.
    pub merged_in_window: u32,
    /// Pull requests skipped as unmerged or merged too early.
    pub skipped: u32,
    /// Pages fetched.
    pub pages: u32,
}

/// Scans repositories for merged pull requests lacking approval.
pub struct PullRequestScanner<'client, G: ?Sized> {
    gateway: &'client G,
    policy: WindowPolicy,
    debug_logging: bool,
}

impl<'client, G> PullRequestScanner<'client, G>
where
    G: GitHubGateway + ?Sized,
{
    /// Creates a scanner with the default early-termination policy.
    #[must_use]
    pub fn new(gateway: &'client G) -> Self {
        Self {
            gateway,
            policy: WindowPolicy::default(),
            debug_logging: false,
        }
    }

    /// Enables per-pull-request and per-review logging.
    #[must_use]
    pub const fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Overrides the early-termination policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Scans every repository in order.
    ///
    /// # Errors
    ///
    /// Returns the cancellation error as soon as a scan is cut short by
    /// cancellation; results gathered so far are discarded.
    pub async fn scan_all(
        &self,
        repositories: &[String],
        window: &ScanWindow,
    ) -> Result<Vec<ScanResult>, ScanError> {
        let total = repositories.len();
        tracing::info!("Processing {total} repositories...");

        let mut results = Vec::with_capacity(total);
        for (index, repository) in repositories.iter().enumerate() {
            tracing::info!(
                "[{position}/{total}] Checking repository: {repository}",
                position = index.saturating_add(1)
            );
            let result = self.scan(repository, window).await;
            if let Some(error) = result.error.as_ref().filter(|error| error.is_cancellation()) {
                return Err(error.clone());
            }
            results.push(result);
        }

        tracing::info!("Completed checking all {total} repositories");
        Ok(results)
    }

    /// Scans one repository for pull requests merged inside `window` that
    /// lack an effective approval.
    ///
    /// Failures never escape: they are recorded in the returned result.
    pub async fn scan(&self, repository: &str, window: &ScanWindow) -> ScanResult {
        let Some(reference) = RepositoryReference::parse(repository) else {
            return ScanResult::failed(
                repository,
                ScanError::InvalidRepository {
                    input: repository.to_owned(),
                },
            );
        };

        if self.debug_logging {
            tracing::debug!(
                "Using time window: PRs merged since {}",
                window.cutoff().to_rfc3339()
            );
        }

        let mut statistics = ScanStatistics::default();
        match self.collect_unapproved(&reference, window, &mut statistics).await {
            Ok(unapproved) => {
                tracing::info!(
                    repository,
                    examined = statistics.examined,
                    merged_in_window = statistics.merged_in_window,
                    skipped = statistics.skipped,
                    pages = statistics.pages,
                    unapproved = unapproved.len(),
                    "Completed checking {repository}: {} total PRs examined, {} merged within time window, {} skipped, {} unapproved",
                    statistics.examined,
                    statistics.merged_in_window,
                    statistics.skipped,
                    unapproved.len()
                );
                ScanResult::completed(repository, unapproved)
            }
            Err(error) => ScanResult::failed(repository, error),
        }
    }

    async fn collect_unapproved(
        &self,
        reference: &RepositoryReference,
        window: &ScanWindow,
        statistics: &mut ScanStatistics,
    ) -> Result<Vec<UnapprovedPullRequest>, ScanError> {
        let mut pagination = WindowedPagination::new(*window, self.policy);
        let mut request = PageRequest::first();
        let mut unapproved = Vec::new();

        loop {
            tracing::info!(
                "Fetching PRs from {reference} (page {page})...",
                page = request.page()
            );
            let page = self
                .gateway
                .pull_request_page(reference, request)
                .await
                .map_err(ScanError::PullRequests)?;
            statistics.pages = statistics.pages.saturating_add(1);

            if !pagination.start_page(page.items.len()) {
                break;
            }

            let mut page_in_window = 0_u32;
            let mut page_skipped = 0_u32;
            for pull_request in &page.items {
                statistics.examined = statistics.examined.saturating_add(1);
                match pagination.observe(pull_request) {
                    Disposition::Stop(reason) => {
                        if self.debug_logging {
                            tracing::debug!(
                                number = pull_request.number,
                                ?reason,
                                counter = pagination.consecutive_out_of_window(),
                                "Stopping further requests at PR #{} (updated at {})",
                                pull_request.number,
                                pull_request.updated_at.to_rfc3339()
                            );
                        }
                        break;
                    }
                    Disposition::Skip(_) => {
                        page_skipped = page_skipped.saturating_add(1);
                        statistics.skipped = statistics.skipped.saturating_add(1);
                    }
                    Disposition::Evaluate => {
                        page_in_window = page_in_window.saturating_add(1);
                        statistics.merged_in_window = statistics.merged_in_window.saturating_add(1);
                        if !self.is_approved(reference, pull_request).await? {
                            unapproved.push(UnapprovedPullRequest::from(pull_request));
                        }
                    }
                }
            }

            tracing::info!(
                "Found {} PRs on page {}, {page_in_window} merged within time window, {page_skipped} skipped",
                page.items.len(),
                page.page
            );

            if !pagination.finish_page(page.has_next) {
                if self.debug_logging {
                    tracing::debug!(
                        reason = ?pagination.stop_reason(),
                        "No further pages requested for {reference}"
                    );
                }
                break;
            }
            request = request.next();
        }

        Ok(unapproved)
    }

    async fn is_approved(
        &self,
        reference: &RepositoryReference,
        pull_request: &PullRequest,
    ) -> Result<bool, ScanError> {
        if self.debug_logging {
            tracing::debug!(
                "Checking PR #{} in {reference}: {} (merged at {})",
                pull_request.number,
                pull_request.title,
                pull_request
                    .merged_at
                    .map(|merged_at| merged_at.to_rfc3339())
                    .unwrap_or_default()
            );
        }

        let reviews = self
            .gateway
            .pull_request_reviews(reference, pull_request.number)
            .await
            .map_err(|source| ScanError::Reviews {
                number: pull_request.number,
                source,
            })?;

        let verdict = evaluate_reviews(&reviews);
        if self.debug_logging {
            for review in &reviews {
                tracing::debug!(
                    "PR #{}: Review by {} with state {}",
                    pull_request.number,
                    review.reviewer.as_deref().unwrap_or_default(),
                    review.state.as_str()
                );
            }
            match &verdict {
                ApprovalVerdict::Approved => tracing::debug!(
                    "PR #{}: Is approved with no pending change requests",
                    pull_request.number
                ),
                ApprovalVerdict::ChangesRequested { reviewer } => tracing::debug!(
                    "PR #{}: Changes requested by {reviewer}, PR not approved",
                    pull_request.number
                ),
                ApprovalVerdict::NoApproval => {
                    tracing::debug!("PR #{}: No approvals found", pull_request.number);
                }
            }
        }

        Ok(verdict.is_approved())
    }
}
