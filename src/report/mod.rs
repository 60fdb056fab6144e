//! Report rendering and delivery.
//!
//! A run outcome is rendered either as Markdown or as a plain-text summary.
//! Markdown reports are posted to Slack when a webhook is configured and
//! written to a file otherwise; when no file can be written the report is
//! printed between markers so that CI logs still carry it.

mod error;
mod markdown;
mod output;
mod slack;
mod summary;

use std::io::Write;

use camino::Utf8PathBuf;

use crate::monitor::RunOutcome;

pub use error::ReportError;
pub use markdown::{NO_ISSUES_MARKDOWN, render_markdown};
pub use output::{
    DEFAULT_OUTPUT_FILE, OUTPUT_END_MARKER, OUTPUT_PATH_ENV, OUTPUT_START_MARKER,
    OutputEnvironment, WrittenReport, marked_output, resolve_output_path, write_report,
    write_report_with_fallback,
};
pub use slack::{SlackBlock, SlackNotifier, SlackPayload, SlackText};
pub use summary::render_summary;

/// How the report is rendered and delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Markdown report rather than plain-text summary.
    pub markdown: bool,
    /// Configured report path.
    pub output: Option<Utf8PathBuf>,
    /// Slack webhook taking the place of file output.
    pub slack_webhook: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            markdown: true,
            output: None,
            slack_webhook: None,
        }
    }
}

/// Where the report was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Posted to Slack.
    Slack,
    /// Slack delivery failed; the report was printed between markers.
    SlackFailed,
    /// Written to a file.
    File(WrittenReport),
    /// No file could be written; the report was printed between markers.
    Printed,
    /// Plain-text summary printed.
    Summary,
}

/// Renders `outcome` according to `options`.
#[must_use]
pub fn render(outcome: &RunOutcome, options: &ReportOptions) -> String {
    if options.markdown {
        render_markdown(outcome)
    } else {
        render_summary(outcome)
    }
}

/// Renders and delivers a report, writing progress to `out`.
pub struct Reporter<'a, W> {
    options: &'a ReportOptions,
    notifier: &'a SlackNotifier,
    environment: OutputEnvironment,
    fallback_dir: Utf8PathBuf,
    out: W,
}

impl<'a, W: Write> Reporter<'a, W> {
    /// Creates a reporter.
    #[must_use]
    pub fn new(
        options: &'a ReportOptions,
        notifier: &'a SlackNotifier,
        environment: OutputEnvironment,
        out: W,
    ) -> Self {
        Self {
            options,
            notifier,
            environment,
            fallback_dir: Utf8PathBuf::from("."),
            out,
        }
    }

    /// Uses `dir` instead of the current directory for fallback writes.
    #[must_use]
    pub fn with_fallback_dir(mut self, dir: Utf8PathBuf) -> Self {
        self.fallback_dir = dir;
        self
    }

    /// Consumes the reporter, returning its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Delivers the report for `outcome`.
    ///
    /// Slack and file failures are logged and reported through the
    /// returned [`Delivery`]; they never fail the run.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] when writing to `out` fails.
    pub async fn deliver(&mut self, outcome: &RunOutcome) -> Result<Delivery, ReportError> {
        let content = render(outcome, self.options);

        if let Some(webhook) = self.options.slack_webhook.as_deref() {
            return self.deliver_to_slack(webhook, &content).await;
        }

        if !self.options.markdown {
            write!(self.out, "{content}")?;
            return Ok(Delivery::Summary);
        }

        write!(self.out, "{content}")?;
        let path = resolve_output_path(self.options.output.as_deref(), &self.environment);
        match write_report_with_fallback(&path, &content, &self.fallback_dir) {
            Ok(written) => {
                writeln!(self.out, "\nMarkdown results written to {}", written.path())?;
                Ok(Delivery::File(written))
            }
            Err(error) => {
                tracing::error!("{error}");
                write!(self.out, "{}", marked_output(&content))?;
                writeln!(
                    self.out,
                    "\nCouldn't write to file. Use the marked output above for webhook integration."
                )?;
                Ok(Delivery::Printed)
            }
        }
    }

    async fn deliver_to_slack(
        &mut self,
        webhook: &str,
        content: &str,
    ) -> Result<Delivery, ReportError> {
        match self.notifier.send(webhook, content).await {
            Ok(()) => {
                writeln!(self.out, "Results sent to Slack successfully")?;
                if self.options.markdown {
                    writeln!(self.out, "\nContent sent to Slack:\n-----------------------------------\n{content}\n-----------------------------------")?;
                }
                Ok(Delivery::Slack)
            }
            Err(error) => {
                tracing::error!("{error}");
                writeln!(self.out, "Failed to send results to Slack")?;
                write!(self.out, "{}", marked_output(content))?;
                Ok(Delivery::SlackFailed)
            }
        }
    }
}
