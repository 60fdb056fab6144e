//! Parsing of `owner/name` repository identifiers.

use std::fmt;

/// Repository identified by owner login and repository name.
///
/// # Example
///
/// ```
/// use gitwarden::github::RepositoryReference;
///
/// let reference = RepositoryReference::parse("acme/widgets").expect("valid reference");
/// assert_eq!(reference.owner(), "acme");
/// assert_eq!(reference.name(), "widgets");
/// assert!(RepositoryReference::parse("acme").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    owner: String,
    name: String,
}

impl RepositoryReference {
    /// Creates a reference from already separated components.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Splits `input` on `/`, accepting it only when exactly two segments
    /// result.
    ///
    /// Segments are not trimmed and may be empty, so `"owner/"` and `"/repo"`
    /// both parse.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut segments = input.split('/');
        let owner = segments.next()?;
        let name = segments.next()?;
        if segments.next().is_some() {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Repository owner login.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("/repos/{}/{}/pulls", self.owner, self.name)
    }

    pub(crate) fn reviews_path(&self, number: u64) -> String {
        format!("/repos/{}/{}/pulls/{number}/reviews", self.owner, self.name)
    }

    pub(crate) fn events_path(&self) -> String {
        format!("/repos/{}/{}/events", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner, self.name)
    }
}
