//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach, and validates it into typed
//! per-monitor settings.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.gitwarden.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `GITWARDEN_*`, plus `GITHUB_TOKEN` which
//!    overrides the token from every other layer when non-empty
//! 4. **Command-line arguments** – `--token`, `--pr-repositories`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! pr_checker_enabled = true
//! pr_repo_visibility = "specific"
//! pr_repositories = ["acme/widgets", "acme/gadgets"]
//! pr_time_window_hours = 24
//! visibility_enabled = true
//! visibility_organizations = ["acme"]
//! ```

mod error;

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::compliance::RepositorySelection;
use crate::github::{PersonalAccessToken, VisibilityMode};
use crate::report::ReportOptions;

pub use error::{ConfigError, Monitor};

/// Default GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Default spacing between GitHub requests, in milliseconds.
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 800;

/// Default merge and check window, in hours.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Environment variable that overrides the configured token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use gitwarden::GitwardenConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = GitwardenConfig::load().expect("failed to load configuration");
/// let validated = config.validate().expect("invalid configuration");
/// assert!(validated.pr_checker.is_some() || validated.visibility.is_some());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GITWARDEN",
    discovery(
        dotfile_name = ".gitwarden.toml",
        config_file_name = "gitwarden.toml",
        app_name = "gitwarden"
    )
)]
pub struct GitwardenConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// `GITHUB_TOKEN` takes precedence when set and non-empty.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URI of the GitHub REST API.
    #[ortho_config()]
    pub api_base: String,

    /// Minimum spacing between GitHub requests, in milliseconds.
    #[ortho_config()]
    pub request_interval_ms: u64,

    /// Enables the pull request approval checker.
    #[ortho_config()]
    pub pr_checker_enabled: bool,

    /// Which repositories the PR checker covers: `specific`, `all`,
    /// `public-only` or `private-only`.
    #[ortho_config()]
    pub pr_repo_visibility: String,

    /// Organisation listed in non-specific modes; the authenticated user's
    /// repositories are listed when unset.
    #[ortho_config()]
    pub pr_organization: Option<String>,

    /// Repositories (`owner/name`) checked in `specific` mode.
    #[ortho_config()]
    pub pr_repositories: Vec<String>,

    /// Full names skipped in non-specific modes.
    #[ortho_config()]
    pub pr_excluded_repositories: Vec<String>,

    /// Merge window in hours.
    #[ortho_config()]
    pub pr_time_window_hours: i64,

    /// Logs every pull request and review the checker examines.
    #[ortho_config()]
    pub pr_debug_logging: bool,

    /// Enables the repository visibility checker.
    #[ortho_config()]
    pub visibility_enabled: bool,

    /// Visibility mode used when listing organisation repositories.
    #[ortho_config()]
    pub visibility_repo_visibility: String,

    /// Organisations checked for recently public repositories.
    #[ortho_config()]
    pub visibility_organizations: Vec<String>,

    /// Check window in hours.
    #[ortho_config()]
    pub visibility_check_window_hours: i64,

    /// Renders the report as Markdown rather than a plain-text summary.
    #[ortho_config()]
    pub markdown: bool,

    /// Path the Markdown report is written to.
    #[ortho_config(cli_short = 'o')]
    pub output: Option<String>,

    /// Slack incoming webhook; when set the report is posted there instead
    /// of being written to a file.
    #[ortho_config()]
    pub slack_webhook: Option<String>,

    /// Emits a JSON run summary on stderr.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for GitwardenConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            request_interval_ms: DEFAULT_REQUEST_INTERVAL_MS,
            pr_checker_enabled: false,
            pr_repo_visibility: VisibilityMode::Specific.as_str().to_owned(),
            pr_organization: None,
            pr_repositories: Vec::new(),
            pr_excluded_repositories: Vec::new(),
            pr_time_window_hours: DEFAULT_WINDOW_HOURS,
            pr_debug_logging: false,
            visibility_enabled: false,
            visibility_repo_visibility: VisibilityMode::Specific.as_str().to_owned(),
            visibility_organizations: Vec::new(),
            visibility_check_window_hours: DEFAULT_WINDOW_HOURS,
            markdown: true,
            output: None,
            slack_webhook: None,
            telemetry: false,
        }
    }
}

/// Validated PR checker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrCheckerSettings {
    /// Repositories to resolve and scan.
    pub selection: RepositorySelection,
    /// Merge window in hours.
    pub window_hours: u32,
    /// Verbose scanner logging.
    pub debug_logging: bool,
}

/// Validated visibility checker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilitySettings {
    /// Listing mode.
    pub mode: VisibilityMode,
    /// Organisations to check.
    pub organizations: Vec<String>,
    /// Check window in hours.
    pub check_window_hours: u32,
}

/// Configuration that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Resolved GitHub token.
    pub token: PersonalAccessToken,
    /// GitHub REST API base URI.
    pub api_base: String,
    /// Spacing between GitHub requests.
    pub request_interval: Duration,
    /// PR checker settings, when enabled.
    pub pr_checker: Option<PrCheckerSettings>,
    /// Visibility checker settings, when enabled.
    pub visibility: Option<VisibilitySettings>,
    /// Report rendering and delivery options.
    pub report: ReportOptions,
    /// Emit the JSON run summary.
    pub telemetry: bool,
}

impl GitwardenConfig {
    /// Resolves the token, preferring a non-empty `GITHUB_TOKEN`.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(|name| env::var(name).ok())
    }

    /// Resolves the token using `lookup` for environment access.
    #[must_use]
    pub fn resolve_token_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(GITHUB_TOKEN_ENV)
            .filter(|value| !value.is_empty())
            .or_else(|| self.token.clone())
            .filter(|value| !value.trim().is_empty())
    }

    /// Validates the configuration, reading `GITHUB_TOKEN` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        self.validate_with_token(self.resolve_token())
    }

    /// Validates the configuration with an already resolved token.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking the token, then the
    /// PR checker, then the PR window, then the visibility checker.
    pub fn validate_with_token(
        &self,
        resolved_token: Option<String>,
    ) -> Result<ValidatedConfig, ConfigError> {
        let token = resolved_token
            .and_then(|value| PersonalAccessToken::new(value).ok())
            .ok_or(ConfigError::MissingToken)?;

        let pr_checker = self.pr_checker_settings()?;
        let pr_window_hours = positive_hours(Monitor::PrChecker, self.pr_time_window_hours)?;
        let visibility = self.visibility_settings()?;

        Ok(ValidatedConfig {
            token,
            api_base: self.api_base.clone(),
            request_interval: Duration::from_millis(self.request_interval_ms),
            pr_checker: pr_checker.map(|selection| PrCheckerSettings {
                selection,
                window_hours: pr_window_hours,
                debug_logging: self.pr_debug_logging,
            }),
            visibility,
            report: ReportOptions {
                markdown: self.markdown,
                output: self.output.as_deref().map(Utf8PathBuf::from),
                slack_webhook: self.slack_webhook.clone(),
            },
            telemetry: self.telemetry,
        })
    }

    fn pr_checker_settings(&self) -> Result<Option<RepositorySelection>, ConfigError> {
        if !self.pr_checker_enabled {
            return Ok(None);
        }

        let mode = parse_mode(Monitor::PrChecker, &self.pr_repo_visibility)?;
        let organization = self
            .pr_organization
            .clone()
            .filter(|organization| !organization.is_empty());

        if mode == VisibilityMode::Specific {
            if self.pr_repositories.is_empty() {
                return Err(ConfigError::MissingRepositories);
            }
            if let Some(ignored) = organization.as_deref() {
                tracing::warn!(
                    "Organization '{ignored}' is specified but repo visibility is 'specific'. The organization setting will be ignored."
                );
            }
        }

        Ok(Some(RepositorySelection {
            visibility: mode.as_str().to_owned(),
            organization,
            repositories: self.pr_repositories.clone(),
            excluded: self.pr_excluded_repositories.clone(),
        }))
    }

    fn visibility_settings(&self) -> Result<Option<VisibilitySettings>, ConfigError> {
        if !self.visibility_enabled {
            return Ok(None);
        }

        let mode = parse_mode(Monitor::Visibility, &self.visibility_repo_visibility)?;
        if self.visibility_organizations.is_empty() {
            return Err(ConfigError::MissingOrganizations);
        }
        let check_window_hours =
            positive_hours(Monitor::Visibility, self.visibility_check_window_hours)?;

        Ok(Some(VisibilitySettings {
            mode,
            organizations: self.visibility_organizations.clone(),
            check_window_hours,
        }))
    }
}

fn parse_mode(monitor: Monitor, value: &str) -> Result<VisibilityMode, ConfigError> {
    value
        .parse::<VisibilityMode>()
        .map_err(|_| ConfigError::InvalidVisibility {
            monitor,
            value: value.to_owned(),
        })
}

fn positive_hours(monitor: Monitor, hours: i64) -> Result<u32, ConfigError> {
    if hours <= 0 {
        return Err(ConfigError::NonPositiveWindow { monitor });
    }
    Ok(u32::try_from(hours).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests;
