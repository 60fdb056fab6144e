//! Tests for recently-public repository detection.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::VisibilityScanner;
use crate::compliance::ScanWindow;
use crate::github::test_support::{GatewayCall, ScriptedGateway, event, repository};
use crate::github::{GitHubError, MockGitHubGateway, PUBLIC_EVENT_TYPE, VisibilityMode};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn window(now: DateTime<Utc>) -> ScanWindow {
    ScanWindow::hours_before(now, 24)
}

fn hours_ago(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    now - TimeDelta::hours(hours)
}

#[rstest]
#[tokio::test]
async fn recently_created_public_repository_is_a_finding_without_events(
    now: DateTime<Utc>,
    window: ScanWindow,
) {
    let gateway = ScriptedGateway::new().with_organization_repositories(
        "acme",
        Ok(vec![repository("acme/new-tool", false, Some(hours_ago(now, 1)))]),
    );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", VisibilityMode::Specific, &window)
        .await
        .expect("organisation listed");

    assert_eq!(findings, vec!["acme/new-tool"]);
    assert!(gateway.event_requests().is_empty());
    assert_eq!(
        gateway.calls().first(),
        Some(&GatewayCall::OrganizationRepositories {
            organization: "acme".to_owned(),
            visibility: VisibilityMode::PublicOnly,
        })
    );
}

#[rstest]
#[tokio::test]
async fn public_event_inside_the_window_is_a_finding(now: DateTime<Utc>, window: ScanWindow) {
    let gateway = ScriptedGateway::new()
        .with_organization_repositories(
            "acme",
            Ok(vec![repository("acme/old", false, Some(hours_ago(now, 500)))]),
        )
        .with_repository_events(
            "acme/old",
            Ok(vec![
                event("PushEvent", Some(hours_ago(now, 1))),
                event(PUBLIC_EVENT_TYPE, Some(hours_ago(now, 5))),
            ]),
        );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", VisibilityMode::PublicOnly, &window)
        .await
        .expect("organisation listed");

    assert_eq!(findings, vec!["acme/old"]);
}

#[rstest]
#[tokio::test]
async fn events_older_than_the_window_end_the_search(now: DateTime<Utc>, window: ScanWindow) {
    let gateway = ScriptedGateway::new()
        .with_organization_repositories(
            "acme",
            Ok(vec![repository("acme/old", false, Some(hours_ago(now, 500)))]),
        )
        .with_repository_events(
            "acme/old",
            Ok(vec![
                event("PushEvent", Some(hours_ago(now, 30))),
                event(PUBLIC_EVENT_TYPE, Some(hours_ago(now, 31))),
            ]),
        );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", VisibilityMode::PublicOnly, &window)
        .await
        .expect("organisation listed");

    assert!(findings.is_empty());
}

#[rstest]
#[tokio::test]
async fn untimestamped_entries_are_treated_as_recent(now: DateTime<Utc>, window: ScanWindow) {
    let gateway = ScriptedGateway::new()
        .with_organization_repositories("acme", Ok(vec![repository("acme/odd", false, None)]))
        .with_repository_events(
            "acme/odd",
            Ok(vec![
                event("WatchEvent", None),
                event(PUBLIC_EVENT_TYPE, None),
                event("PushEvent", Some(hours_ago(now, 40))),
            ]),
        );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", VisibilityMode::PublicOnly, &window)
        .await
        .expect("organisation listed");

    assert_eq!(findings, vec!["acme/odd"]);
    assert_eq!(gateway.event_requests(), vec!["acme/odd"]);
}

#[rstest]
#[case::all(VisibilityMode::All, vec!["acme/public-new"])]
#[case::private_only(VisibilityMode::PrivateOnly, vec![])]
#[case::public_only(VisibilityMode::PublicOnly, vec!["acme/public-new"])]
#[tokio::test]
async fn only_currently_public_repositories_are_findings(
    now: DateTime<Utc>,
    window: ScanWindow,
    #[case] mode: VisibilityMode,
    #[case] expected: Vec<&str>,
) {
    let gateway = ScriptedGateway::new().with_organization_repositories(
        "acme",
        Ok(vec![
            repository("acme/public-new", false, Some(hours_ago(now, 2))),
            repository("acme/private-new", true, Some(hours_ago(now, 2))),
        ]),
    );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", mode, &window)
        .await
        .expect("organisation listed");

    assert_eq!(findings, expected);
    assert_eq!(
        gateway.calls().first(),
        Some(&GatewayCall::OrganizationRepositories {
            organization: "acme".to_owned(),
            visibility: mode,
        })
    );
}

#[rstest]
#[tokio::test]
async fn event_failures_skip_only_that_repository(now: DateTime<Utc>, window: ScanWindow) {
    let gateway = ScriptedGateway::new()
        .with_organization_repositories(
            "acme",
            Ok(vec![
                repository("acme/broken", false, Some(hours_ago(now, 100))),
                repository("acme/fresh", false, Some(hours_ago(now, 3))),
            ]),
        )
        .with_repository_events(
            "acme/broken",
            Err(GitHubError::Network {
                message: "connection reset".to_owned(),
            }),
        );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", VisibilityMode::PublicOnly, &window)
        .await
        .expect("organisation listed");

    assert_eq!(findings, vec!["acme/fresh"]);
}

#[rstest]
#[tokio::test]
async fn run_skips_organisations_that_fail(now: DateTime<Utc>, window: ScanWindow) {
    let gateway = ScriptedGateway::new().with_organization_repositories(
        "acme",
        Ok(vec![repository("acme/new-tool", false, Some(hours_ago(now, 1)))]),
    );
    let organizations = vec!["missing".to_owned(), "acme".to_owned()];

    let findings = VisibilityScanner::new(&gateway)
        .run(&organizations, VisibilityMode::Specific, &window)
        .await
        .expect("run completes");

    assert_eq!(findings, vec!["acme/new-tool"]);
}

#[rstest]
#[tokio::test]
async fn run_propagates_cancellation(window: ScanWindow) {
    let mut gateway = MockGitHubGateway::new();
    gateway
        .expect_organization_repositories()
        .times(1)
        .returning(|_, _| Err(GitHubError::Cancelled));
    let organizations = vec!["acme".to_owned(), "other".to_owned()];

    let outcome = VisibilityScanner::new(&gateway)
        .run(&organizations, VisibilityMode::All, &window)
        .await;

    assert_eq!(outcome, Err(GitHubError::Cancelled));
}

#[rstest]
#[tokio::test]
async fn check_repository_answers_for_one_repository(now: DateTime<Utc>, window: ScanWindow) {
    let gateway = ScriptedGateway::new().with_organization_repositories(
        "acme",
        Ok(vec![
            repository("acme/new-tool", false, Some(hours_ago(now, 1))),
            repository("acme/old", false, Some(hours_ago(now, 90))),
        ]),
    );
    let scanner = VisibilityScanner::new(&gateway);

    assert_eq!(
        scanner.check_repository("acme", "new-tool", &window).await,
        Ok(true)
    );
    assert_eq!(scanner.check_repository("acme", "old", &window).await, Ok(false));
    assert_eq!(
        scanner.check_repository("acme", "absent", &window).await,
        Ok(false)
    );
}

#[rstest]
#[tokio::test]
async fn check_repository_surfaces_event_errors(now: DateTime<Utc>, window: ScanWindow) {
    let failure = GitHubError::Api {
        message: "list repository events failed with status 500".to_owned(),
    };
    let gateway = ScriptedGateway::new()
        .with_organization_repositories(
            "acme",
            Ok(vec![repository("acme/old", false, Some(hours_ago(now, 90)))]),
        )
        .with_repository_events("acme/old", Err(failure.clone()));

    let outcome = VisibilityScanner::new(&gateway)
        .check_repository("acme", "old", &window)
        .await;

    assert_eq!(outcome, Err(failure));
}

#[rstest]
#[tokio::test]
async fn private_only_ignores_public_repositories_the_listing_returns(
    now: DateTime<Utc>,
    window: ScanWindow,
) {
    let gateway = ScriptedGateway::new().with_organization_repositories(
        "acme",
        Ok(vec![
            repository("acme/leaked", false, Some(hours_ago(now, 1))),
            repository("acme/undated", false, None),
        ]),
    );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", VisibilityMode::PrivateOnly, &window)
        .await
        .expect("organisation listed");

    assert!(findings.is_empty());
    assert!(gateway.event_requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn public_only_ignores_private_repositories_the_listing_returns(
    now: DateTime<Utc>,
    window: ScanWindow,
) {
    let gateway = ScriptedGateway::new().with_organization_repositories(
        "acme",
        Ok(vec![repository("acme/secret", true, None)]),
    );

    let findings = VisibilityScanner::new(&gateway)
        .check_organization("acme", VisibilityMode::PublicOnly, &window)
        .await
        .expect("organisation listed");

    assert!(findings.is_empty());
    assert!(gateway.event_requests().is_empty());
}

/// A missing creation time is not taken as evidence of a recent change: the
/// event history decides, in organisation checks as in single-repository
/// checks.
#[rstest]
#[tokio::test]
async fn missing_creation_time_is_judged_by_event_history(
    now: DateTime<Utc>,
    window: ScanWindow,
) {
    let gateway = ScriptedGateway::new()
        .with_organization_repositories("acme", Ok(vec![repository("acme/nodate", false, None)]))
        .with_repository_events(
            "acme/nodate",
            Ok(vec![event("PushEvent", Some(hours_ago(now, 500)))]),
        );

    let scanner = VisibilityScanner::new(&gateway);
    let findings = scanner
        .check_organization("acme", VisibilityMode::All, &window)
        .await
        .expect("organisation listed");
    let single = scanner
        .check_repository("acme", "nodate", &window)
        .await
        .expect("repository checked");

    assert!(findings.is_empty());
    assert!(!single);
    assert_eq!(gateway.event_requests(), vec!["acme/nodate", "acme/nodate"]);
}
