//! Repository visibility modes shared by configuration and listing helpers.

use std::fmt;
use std::str::FromStr;

/// How a monitor selects the repositories it inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityMode {
    /// Use an explicitly configured list.
    #[default]
    Specific,
    /// Every repository regardless of visibility.
    All,
    /// Only public repositories.
    PublicOnly,
    /// Only private repositories.
    PrivateOnly,
}

/// The value was not one of `specific`, `all`, `public-only`, `private-only`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVisibility(pub String);

impl fmt::Display for UnknownVisibility {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "invalid repository visibility: {}. Must be one of: all, public-only, private-only, specific",
            self.0
        )
    }
}

impl std::error::Error for UnknownVisibility {}

impl VisibilityMode {
    /// Configuration spelling of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Specific => "specific",
            Self::All => "all",
            Self::PublicOnly => "public-only",
            Self::PrivateOnly => "private-only",
        }
    }

    /// Query value GitHub understands for repository listings, or `None` for
    /// [`VisibilityMode::Specific`], which has no server-side equivalent.
    #[must_use]
    pub const fn api_filter(self) -> Option<&'static str> {
        match self {
            Self::Specific => None,
            Self::All => Some("all"),
            Self::PublicOnly => Some("public"),
            Self::PrivateOnly => Some("private"),
        }
    }
}

impl FromStr for VisibilityMode {
    type Err = UnknownVisibility;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "specific" => Ok(Self::Specific),
            "all" => Ok(Self::All),
            "public-only" => Ok(Self::PublicOnly),
            "private-only" => Ok(Self::PrivateOnly),
            other => Err(UnknownVisibility(other.to_owned())),
        }
    }
}

impl fmt::Display for VisibilityMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
