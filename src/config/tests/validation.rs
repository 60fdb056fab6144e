//! Tests for configuration validation.

use std::time::Duration;

use rstest::rstest;

use super::helpers::enabled_config;
use crate::GitwardenConfig;
use crate::config::{ConfigError, Monitor};
use crate::github::VisibilityMode;

fn token() -> Option<String> {
    Some("ghp_example".to_owned())
}

#[rstest]
fn missing_token_is_reported_first() {
    let config = GitwardenConfig {
        pr_checker_enabled: true,
        ..GitwardenConfig::default()
    };

    assert_eq!(
        config.validate_with_token(None),
        Err(ConfigError::MissingToken)
    );
    assert_eq!(
        config.validate_with_token(Some("  ".to_owned())),
        Err(ConfigError::MissingToken)
    );
}

#[rstest]
#[case::pr_checker(
    GitwardenConfig { pr_repo_visibility: "internal".to_owned(), ..enabled_config() },
    ConfigError::InvalidVisibility { monitor: Monitor::PrChecker, value: "internal".to_owned() }
)]
#[case::missing_repositories(
    GitwardenConfig { pr_repositories: Vec::new(), ..enabled_config() },
    ConfigError::MissingRepositories
)]
#[case::zero_pr_window(
    GitwardenConfig { pr_time_window_hours: 0, ..enabled_config() },
    ConfigError::NonPositiveWindow { monitor: Monitor::PrChecker }
)]
#[case::pr_window_checked_when_disabled(
    GitwardenConfig { pr_checker_enabled: false, pr_time_window_hours: -3, ..enabled_config() },
    ConfigError::NonPositiveWindow { monitor: Monitor::PrChecker }
)]
#[case::visibility_mode(
    GitwardenConfig {
        visibility_enabled: true,
        visibility_repo_visibility: "hidden".to_owned(),
        visibility_organizations: vec!["acme".to_owned()],
        ..enabled_config()
    },
    ConfigError::InvalidVisibility { monitor: Monitor::Visibility, value: "hidden".to_owned() }
)]
#[case::missing_organisations(
    GitwardenConfig { visibility_enabled: true, ..enabled_config() },
    ConfigError::MissingOrganizations
)]
#[case::missing_organisations_in_all_mode(
    GitwardenConfig {
        visibility_enabled: true,
        visibility_repo_visibility: "all".to_owned(),
        ..enabled_config()
    },
    ConfigError::MissingOrganizations
)]
#[case::zero_check_window(
    GitwardenConfig {
        visibility_enabled: true,
        visibility_organizations: vec!["acme".to_owned()],
        visibility_check_window_hours: 0,
        ..enabled_config()
    },
    ConfigError::NonPositiveWindow { monitor: Monitor::Visibility }
)]
fn invalid_configurations_are_rejected(
    #[case] config: GitwardenConfig,
    #[case] expected: ConfigError,
) {
    assert_eq!(config.validate_with_token(token()), Err(expected));
}

#[rstest]
fn organisation_with_specific_mode_is_only_a_warning() {
    let config = GitwardenConfig {
        pr_organization: Some("acme".to_owned()),
        ..enabled_config()
    };

    let validated = config
        .validate_with_token(token())
        .expect("organisation is ignored, not rejected");
    let settings = validated.pr_checker.expect("PR checker enabled");

    assert_eq!(settings.selection.visibility, "specific");
    assert_eq!(settings.selection.repositories, vec!["acme/widgets"]);
}

#[rstest]
fn disabled_monitors_skip_their_rules() {
    let config = GitwardenConfig {
        pr_checker_enabled: false,
        pr_repo_visibility: "bogus".to_owned(),
        visibility_enabled: false,
        visibility_repo_visibility: "bogus".to_owned(),
        ..enabled_config()
    };

    let validated = config
        .validate_with_token(token())
        .expect("disabled monitors are not validated");

    assert!(validated.pr_checker.is_none());
    assert!(validated.visibility.is_none());
}

#[rstest]
fn valid_configuration_yields_typed_settings() {
    let config = GitwardenConfig {
        pr_repo_visibility: "public-only".to_owned(),
        pr_organization: Some("acme".to_owned()),
        pr_excluded_repositories: vec!["acme/legacy".to_owned()],
        pr_time_window_hours: 48,
        pr_debug_logging: true,
        visibility_enabled: true,
        visibility_repo_visibility: "all".to_owned(),
        visibility_organizations: vec!["acme".to_owned()],
        visibility_check_window_hours: 6,
        request_interval_ms: 250,
        output: Some("reports/out.md".to_owned()),
        ..enabled_config()
    };

    let validated = config
        .validate_with_token(token())
        .expect("configuration is valid");

    let pr = validated.pr_checker.expect("PR checker enabled");
    assert_eq!(pr.selection.visibility, "public-only");
    assert_eq!(pr.selection.organization.as_deref(), Some("acme"));
    assert_eq!(pr.selection.excluded, vec!["acme/legacy"]);
    assert_eq!(pr.window_hours, 48);
    assert!(pr.debug_logging);

    let visibility = validated.visibility.expect("visibility enabled");
    assert_eq!(visibility.mode, VisibilityMode::All);
    assert_eq!(visibility.organizations, vec!["acme"]);
    assert_eq!(visibility.check_window_hours, 6);

    assert_eq!(validated.request_interval, Duration::from_millis(250));
    assert_eq!(
        validated.report.output.as_ref().map(|path| path.as_str()),
        Some("reports/out.md")
    );
    assert!(validated.report.markdown);
}

#[rstest]
fn error_messages_name_the_monitor() {
    let error = ConfigError::NonPositiveWindow {
        monitor: Monitor::Visibility,
    };
    assert_eq!(
        error.to_string(),
        "time window for repo_visibility monitor must be greater than 0"
    );
}
