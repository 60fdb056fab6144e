//! Pull request approval compliance.
//!
//! For each configured repository the scanner pages through closed pull
//! requests, newest update first, and reports every pull request merged
//! inside the window whose reviews do not amount to an approval. The
//! [`RepositorySetResolver`] turns the configured selection into the list of
//! repositories to scan.

mod error;
mod resolver;
mod result;
mod scanner;
mod verdict;
mod window;

pub use error::ScanError;
pub use resolver::{
    ALL_REPOSITORIES_LABEL, RepositorySelection, RepositorySetResolver, ResolutionFailure,
    USER_REPOSITORIES_LABEL,
};
pub use result::{ScanResult, UnapprovedPullRequest};
pub use scanner::{PullRequestScanner, ScanStatistics};
pub use verdict::{ApprovalVerdict, GHOST_LOGIN, evaluate_reviews};
pub use window::{
    Disposition, EMPTY_PAGE_PENALTY, OUT_OF_WINDOW_THRESHOLD, PaginationPhase, ScanWindow,
    SkipReason, StopReason, WindowPolicy, WindowedPagination,
};
