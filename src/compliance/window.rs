//! Merge-window bounds and the windowed pagination state machine.
//!
//! Closed pull requests are listed by `updated_at` descending, so the scan
//! can stop as soon as the listing leaves the window. [`WindowedPagination`]
//! owns that decision: callers feed it each pull request and each finished
//! page, and it answers whether to evaluate, skip or stop.

use chrono::{DateTime, TimeDelta, Utc};

use crate::github::PullRequest;

/// Consecutive out-of-window pull requests tolerated before a scan stops.
pub const OUT_OF_WINDOW_THRESHOLD: u32 = 20;

/// Counter increment applied after a full page with nothing in the window.
pub const EMPTY_PAGE_PENALTY: u32 = 10;

/// The half-open time range `[cutoff, now]` a scan inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    cutoff: DateTime<Utc>,
}

impl ScanWindow {
    /// Window of `length` ending at `now`.
    #[must_use]
    pub fn ending_at(now: DateTime<Utc>, length: TimeDelta) -> Self {
        let cutoff = now
            .checked_sub_signed(length)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { cutoff }
    }

    /// Window of `hours` hours ending at `now`.
    #[must_use]
    pub fn hours_before(now: DateTime<Utc>, hours: u32) -> Self {
        Self::ending_at(now, TimeDelta::hours(i64::from(hours)))
    }

    /// Window of `hours` hours ending at the current time.
    #[must_use]
    pub fn trailing_hours(hours: u32) -> Self {
        Self::hours_before(Utc::now(), hours)
    }

    /// Earliest instant inside the window.
    #[must_use]
    pub const fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    /// Returns true when `instant` is at or after the cutoff.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.cutoff
    }
}

/// Early-termination tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Counter value at which the scan stops.
    pub threshold: u32,
    /// Added to the counter after a non-final page with no in-window merges.
    pub empty_page_penalty: u32,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            threshold: OUT_OF_WINDOW_THRESHOLD,
            empty_page_penalty: EMPTY_PAGE_PENALTY,
        }
    }
}

/// Where the pagination currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationPhase {
    /// Waiting for (or starting) a page.
    Fetching,
    /// The most recent pull request merged inside the window.
    InWindow,
    /// The most recent pull requests were skipped as out of window.
    TrailingOutOfWindow,
    /// No further pull requests or pages will be examined.
    Done,
}

/// Why a pull request was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Closed without merging.
    NotMerged,
    /// Merged before the cutoff.
    MergedBeforeCutoff,
}

/// Why the scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A pull request was last updated before the cutoff.
    UpdatedBeforeCutoff,
    /// Too many consecutive pull requests merged before the cutoff.
    ConsecutiveOutOfWindow,
    /// Full pages without in-window merges pushed the counter over the
    /// threshold.
    EmptyWindowPages,
    /// The server returned an empty page.
    EmptyPage,
    /// The server advertised no further page.
    LastPage,
}

/// What to do with one pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Merged inside the window; evaluate its reviews.
    Evaluate,
    /// Outside the window; move on to the next pull request.
    Skip(SkipReason),
    /// Stop the scan without evaluating this pull request.
    Stop(StopReason),
}

/// State machine deciding how far to page through closed pull requests.
#[derive(Debug, Clone)]
pub struct WindowedPagination {
    window: ScanWindow,
    policy: WindowPolicy,
    phase: PaginationPhase,
    consecutive_out_of_window: u32,
    in_window_on_page: u32,
    stop_reason: Option<StopReason>,
}

impl WindowedPagination {
    /// Starts a pagination for `window`.
    #[must_use]
    pub const fn new(window: ScanWindow, policy: WindowPolicy) -> Self {
        Self {
            window,
            policy,
            phase: PaginationPhase::Fetching,
            consecutive_out_of_window: 0,
            in_window_on_page: 0,
            stop_reason: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PaginationPhase {
        self.phase
    }

    /// Current consecutive out-of-window counter.
    #[must_use]
    pub const fn consecutive_out_of_window(&self) -> u32 {
        self.consecutive_out_of_window
    }

    /// Why the pagination finished, once it has.
    #[must_use]
    pub const fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Returns true once no more pull requests should be examined.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.phase, PaginationPhase::Done)
    }

    /// Registers a freshly fetched page. Returns false, finishing the scan,
    /// when the page is empty.
    pub const fn start_page(&mut self, item_count: usize) -> bool {
        self.in_window_on_page = 0;
        if item_count == 0 {
            self.stop(StopReason::EmptyPage);
            return false;
        }
        true
    }

    /// Classifies the next pull request of the current page.
    pub fn observe(&mut self, pull_request: &PullRequest) -> Disposition {
        if self.is_done() {
            return Disposition::Stop(self.stop_reason.unwrap_or(StopReason::LastPage));
        }

        if !self.window.contains(pull_request.updated_at) {
            self.stop(StopReason::UpdatedBeforeCutoff);
            return Disposition::Stop(StopReason::UpdatedBeforeCutoff);
        }

        let Some(merged_at) = pull_request.merged_at else {
            self.bump_counter(1);
            self.phase = PaginationPhase::TrailingOutOfWindow;
            return Disposition::Skip(SkipReason::NotMerged);
        };

        if !self.window.contains(merged_at) {
            self.bump_counter(1);
            if self.consecutive_out_of_window >= self.policy.threshold {
                self.stop(StopReason::ConsecutiveOutOfWindow);
                return Disposition::Stop(StopReason::ConsecutiveOutOfWindow);
            }
            self.phase = PaginationPhase::TrailingOutOfWindow;
            return Disposition::Skip(SkipReason::MergedBeforeCutoff);
        }

        self.consecutive_out_of_window = 0;
        self.in_window_on_page = self.in_window_on_page.saturating_add(1);
        self.phase = PaginationPhase::InWindow;
        Disposition::Evaluate
    }

    /// Closes the current page. Returns true when the next page should be
    /// fetched.
    pub const fn finish_page(&mut self, has_next: bool) -> bool {
        if self.is_done() {
            return false;
        }
        if !has_next {
            self.stop(StopReason::LastPage);
            return false;
        }
        if self.in_window_on_page == 0 {
            self.bump_counter(self.policy.empty_page_penalty);
            if self.consecutive_out_of_window >= self.policy.threshold {
                self.stop(StopReason::EmptyWindowPages);
                return false;
            }
        }
        self.phase = PaginationPhase::Fetching;
        true
    }

    const fn bump_counter(&mut self, amount: u32) {
        self.consecutive_out_of_window = self.consecutive_out_of_window.saturating_add(amount);
    }

    const fn stop(&mut self, reason: StopReason) {
        self.phase = PaginationPhase::Done;
        self.stop_reason = Some(reason);
    }
}
