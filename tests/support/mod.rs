//! Shared helpers for integration tests against a mock GitHub API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use gitwarden::{GitwardenConfig, OctocrabGateway, PersonalAccessToken, RequestThrottle};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fixed instant every run in these tests ends at.
pub(crate) fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Builds a gateway pointed at `server` without request spacing.
pub(crate) fn gateway_for(server: &MockServer, cancel: CancellationToken) -> OctocrabGateway {
    let token = PersonalAccessToken::new("ghp_integration").expect("token should be valid");
    OctocrabGateway::for_token(
        &token,
        &server.uri(),
        RequestThrottle::new(Duration::ZERO),
        cancel,
    )
    .expect("should create gateway")
}

/// Configuration with both checkers disabled and the given API base.
pub(crate) fn base_config(server: &MockServer) -> GitwardenConfig {
    GitwardenConfig {
        api_base: server.uri(),
        request_interval_ms: 0,
        ..GitwardenConfig::default()
    }
}

pub(crate) fn pull_request_json(number: u64, merged_at: &str) -> Value {
    json!({
        "number": number,
        "title": format!("Change {number}"),
        "user": { "login": "octocat" },
        "html_url": format!("https://github.com/acme/widgets/pull/{number}"),
        "created_at": merged_at,
        "updated_at": merged_at,
        "merged_at": merged_at
    })
}

pub(crate) fn review_json(login: &str, state: &str) -> Value {
    json!({
        "user": { "login": login },
        "state": state,
        "submitted_at": "2025-03-10T08:00:00Z"
    })
}

pub(crate) fn repository_json(full_name: &str, private: bool, created_at: &str) -> Value {
    let name = full_name.rsplit_once('/').map_or(full_name, |(_, name)| name);
    json!({
        "name": name,
        "full_name": full_name,
        "private": private,
        "created_at": created_at
    })
}

/// Serves `body` for GET requests to `route`.
pub(crate) async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serves a healthy quota on `/rate_limit`.
pub(crate) async fn mount_rate_limit(server: &MockServer) {
    let reset = 1_741_608_000_u64;
    mount_json(
        server,
        "/rate_limit",
        json!({
            "resources": {
                "core": { "limit": 5000, "used": 10, "remaining": 4990, "reset": reset },
                "search": { "limit": 30, "used": 0, "remaining": 30, "reset": reset }
            },
            "rate": { "limit": 5000, "used": 10, "remaining": 4990, "reset": reset }
        }),
    )
    .await;
}
