//! Scheduled GitHub policy checks.
//!
//! gitwarden runs two monitors against the GitHub REST API: the PR checker
//! reports pull requests merged without an effective approval, and the
//! visibility checker reports repositories that recently became public. A
//! run renders its outcome as Markdown or a plain-text summary and delivers
//! it to a file, standard output or a Slack webhook.

pub mod compliance;
pub mod config;
pub mod github;
pub mod monitor;
pub mod report;
pub mod telemetry;
pub mod visibility;

pub use config::{ConfigError, GitwardenConfig, ValidatedConfig};
pub use github::{
    GitHubError, GitHubGateway, OctocrabGateway, PersonalAccessToken, RequestThrottle,
    VisibilityMode,
};
pub use monitor::{RunError, RunOutcome, run};
pub use report::{OutputEnvironment, ReportOptions, Reporter, SlackNotifier};
