//! Slack incoming-webhook delivery.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;

use super::error::ReportError;

/// Summary used when the report has no `## ` heading.
pub const DEFAULT_SUMMARY: &str = "Git Monitoring Results";

/// Longest block text Slack accepts.
pub const MAX_BLOCK_TEXT: usize = 3000;

const TRUNCATED_LENGTH: usize = 2950;
const TRUNCATION_NOTICE: &str = "...\n```\n(Content truncated due to size limits)";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Webhook request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackPayload {
    /// Notification fallback text.
    pub text: String,
    /// Message blocks.
    pub blocks: Vec<SlackBlock>,
}

/// One message block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackBlock {
    /// Block type, always `section`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Block text.
    pub text: SlackText,
}

/// Text object inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackText {
    /// Text type, always `mrkdwn`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Text content.
    pub text: String,
}

impl SlackPayload {
    /// Builds the payload for a Markdown report.
    ///
    /// The summary is the first `## ` heading. The report is wrapped in a
    /// code fence and cut to fit Slack's block limit.
    #[must_use]
    pub fn for_report(content: &str) -> Self {
        let summary = content
            .lines()
            .find_map(|line| line.strip_prefix("## "))
            .unwrap_or(DEFAULT_SUMMARY)
            .to_owned();
        let text = truncate_block(format!("*{summary}*\n\n```\n{content}\n```"));

        Self {
            text: summary,
            blocks: vec![SlackBlock {
                kind: "section",
                text: SlackText {
                    kind: "mrkdwn",
                    text,
                },
            }],
        }
    }
}

fn truncate_block(formatted: String) -> String {
    if formatted.chars().count() <= MAX_BLOCK_TEXT {
        return formatted;
    }
    let mut truncated: String = formatted.chars().take(TRUNCATED_LENGTH).collect();
    truncated.push_str(TRUNCATION_NOTICE);
    truncated
}

/// Posts reports to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: Client,
}

impl SlackNotifier {
    /// Creates a notifier with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Slack`] when the HTTP client cannot be built.
    pub fn new() -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|error| ReportError::Slack {
                message: format!("failed to configure Slack HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }

    /// Sends `content` to `webhook`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InsecureWebhook`] unless the URL uses HTTPS,
    /// and [`ReportError::Slack`] when delivery fails.
    pub async fn send(&self, webhook: &str, content: &str) -> Result<(), ReportError> {
        if !Url::parse(webhook).is_ok_and(|url| url.scheme() == "https") {
            return Err(ReportError::InsecureWebhook);
        }
        tracing::info!("Sending report to Slack webhook {}", mask_webhook(webhook));
        self.post(webhook, &SlackPayload::for_report(content)).await
    }

    pub(crate) async fn post(&self, url: &str, payload: &SlackPayload) -> Result<(), ReportError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|error| ReportError::Slack {
                message: format!("Slack request transport failed: {error}"),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| content.chars().take(160).collect(),
            );
            return Err(ReportError::Slack {
                message: format!("Slack webhook returned status {}: {body}", status.as_u16()),
            });
        }

        tracing::info!("Successfully sent results to Slack webhook (HTTP {})", status.as_u16());
        Ok(())
    }
}

fn mask_webhook(webhook: &str) -> String {
    let characters: Vec<char> = webhook.chars().collect();
    if characters.len() <= 18 {
        return "(masked)".to_owned();
    }
    let head: String = characters.iter().take(8).collect();
    let tail: String = characters
        .iter()
        .skip(characters.len().saturating_sub(10))
        .collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{MAX_BLOCK_TEXT, SlackNotifier, SlackPayload, mask_webhook};
    use crate::report::ReportError;

    #[test]
    fn payload_uses_first_heading_as_summary() {
        let payload = SlackPayload::for_report("intro\n## :x: Unapproved Pull Requests\n\n| a |\n");

        assert_eq!(payload.text, ":x: Unapproved Pull Requests");
        let block = payload.blocks.first().expect("one block");
        assert_eq!(block.kind, "section");
        assert_eq!(block.text.kind, "mrkdwn");
        assert_eq!(
            block.text.text,
            "*:x: Unapproved Pull Requests*\n\n```\nintro\n## :x: Unapproved Pull Requests\n\n| a |\n\n```"
        );
    }

    #[test]
    fn payload_without_heading_uses_default_summary() {
        let payload = SlackPayload::for_report("plain text");
        assert_eq!(payload.text, "Git Monitoring Results");
    }

    #[rstest]
    #[case::ascii('x')]
    #[case::multibyte('é')]
    fn oversized_reports_are_truncated(#[case] filler: char) {
        let content: String = std::iter::repeat_n(filler, 5000).collect();

        let payload = SlackPayload::for_report(&content);
        let text = &payload.blocks.first().expect("one block").text.text;

        assert!(text.ends_with("...\n```\n(Content truncated due to size limits)"));
        assert!(text.chars().count() <= MAX_BLOCK_TEXT);
    }

    #[test]
    fn payload_serialises_with_slack_field_names() {
        let payload = SlackPayload::for_report("## Heading");
        let json = serde_json::to_value(&payload).expect("serialisable");

        assert_eq!(json["text"], "Heading");
        assert_eq!(json["blocks"][0]["type"], "section");
        assert_eq!(json["blocks"][0]["text"]["type"], "mrkdwn");
    }

    #[rstest]
    #[case::plain_http("http://hooks.slack.com/services/T/B/X")]
    #[case::not_a_url("hooks.slack.com/services/T/B/X")]
    #[case::empty("")]
    #[tokio::test]
    async fn insecure_webhooks_are_rejected(#[case] webhook: &str) {
        let notifier = SlackNotifier::new().expect("client builds");

        let result = notifier.send(webhook, "## Report").await;

        assert_eq!(result, Err(ReportError::InsecureWebhook));
    }

    #[tokio::test]
    async fn posts_the_payload_as_json() {
        let server = MockServer::start().await;
        let payload = SlackPayload::for_report("## :white_check_mark: No Issues Found");
        Mock::given(method("POST"))
            .and(path("/services/T/B/X"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;
        let notifier = SlackNotifier::new().expect("client builds");

        let result = notifier
            .post(&format!("{}/services/T/B/X", server.uri()), &payload)
            .await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no_service"))
            .mount(&server)
            .await;
        let notifier = SlackNotifier::new().expect("client builds");

        let result = notifier
            .post(&server.uri(), &SlackPayload::for_report("## Report"))
            .await;

        match result {
            Err(ReportError::Slack { message }) => {
                assert!(message.contains("404"), "unexpected message: {message}");
                assert!(message.contains("no_service"), "unexpected message: {message}");
            }
            other => panic!("expected Slack error, got {other:?}"),
        }
    }

    #[test]
    fn webhook_urls_are_masked() {
        assert_eq!(
            mask_webhook("https://hooks.slack.com/services/T000/B000/XXXXXXXXXX"),
            "https://...XXXXXXXXXX"
        );
        assert_eq!(mask_webhook("https://x"), "(masked)");
    }
}
