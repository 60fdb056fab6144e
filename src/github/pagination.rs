//! Page requests and page results for GitHub list endpoints.
//!
//! GitHub list endpoints are 1-based and cap `per_page` at 100. A
//! [`ListPage`] carries the items of one page together with whether the
//! server advertised a `next` link, which is the only signal callers use to
//! decide whether to keep paging.

use super::error::GitHubError;

/// Largest page size the GitHub API accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// A validated page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u8,
}

impl PageRequest {
    /// Creates a page request, rejecting zero values and oversized pages.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] when `page` or `per_page` is zero or
    /// `per_page` exceeds [`MAX_PER_PAGE`].
    pub fn new(page: u32, per_page: u8) -> Result<Self, GitHubError> {
        if page == 0 {
            return Err(invalid("page must be at least 1"));
        }
        if per_page == 0 {
            return Err(invalid("per_page must be at least 1"));
        }
        if per_page > MAX_PER_PAGE {
            return Err(invalid("per_page must not exceed 100"));
        }
        Ok(Self { page, per_page })
    }

    /// First page at the maximum page size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    }

    /// Returns the page number (1-based).
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn per_page(self) -> u8 {
        self.per_page
    }

    /// The request for the following page.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }

    pub(crate) fn query(self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

fn invalid(message: &str) -> GitHubError {
    GitHubError::Api {
        message: format!("invalid pagination: {message}"),
    }
}

/// One page of results from a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// Page number this result came from.
    pub page: u32,
    /// Whether the server advertised a following page.
    pub has_next: bool,
}

impl<T> ListPage<T> {
    /// Builds the final page of a listing.
    #[must_use]
    pub const fn last(items: Vec<T>, page: u32) -> Self {
        Self {
            items,
            page,
            has_next: false,
        }
    }

    /// Builds a page that is followed by another.
    #[must_use]
    pub const fn with_next(items: Vec<T>, page: u32) -> Self {
        Self {
            items,
            page,
            has_next: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{MAX_PER_PAGE, PageRequest};
    use crate::github::GitHubError;

    #[rstest]
    #[case::zero_page(0, 30)]
    #[case::zero_per_page(1, 0)]
    #[case::oversized(1, MAX_PER_PAGE + 1)]
    fn rejects_invalid_page_requests(#[case] page: u32, #[case] per_page: u8) {
        let result = PageRequest::new(page, per_page);
        assert!(
            matches!(result, Err(GitHubError::Api { .. })),
            "expected invalid pagination, got {result:?}"
        );
    }

    #[test]
    fn next_keeps_page_size() {
        let request = PageRequest::new(2, 50).expect("valid request");
        let following = request.next();
        assert_eq!(following.page(), 3);
        assert_eq!(following.per_page(), 50);
    }

    #[test]
    fn first_page_uses_maximum_size() {
        let first = PageRequest::first();
        assert_eq!(first.page(), 1);
        assert_eq!(first.per_page(), MAX_PER_PAGE);
        assert_eq!(
            first.query(),
            [("page", "1".to_owned()), ("per_page", "100".to_owned())]
        );
    }
}
