//! Logging setup and the run summary event.
//!
//! Human-readable logs go to stderr through `tracing`. When telemetry is
//! enabled the run also emits a single JSON line describing its outcome so
//! that schedulers can scrape it without parsing the report.

use std::io;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::monitor::RunOutcome;

/// Filter used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_filter(debug: bool) -> &'static str {
    if debug { "gitwarden=debug" } else { "gitwarden=info" }
}

/// Installs the global stderr subscriber.
///
/// `RUST_LOG` overrides the default filter. Calling this more than once
/// leaves the first subscriber in place.
pub fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
    if let Err(error) = installed {
        tracing::debug!("logging already initialised: {error}");
    }
}

/// A structured telemetry event emitted by gitwarden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Summarises a finished run.
    RunCompleted {
        /// Repositories the PR checker reported on.
        repositories_checked: usize,
        /// Merged pull requests without an effective approval.
        unapproved_pull_requests: usize,
        /// Repository scans that failed.
        scan_errors: usize,
        /// Repositories that recently became public.
        recently_public: usize,
    },
}

impl TelemetryEvent {
    /// Builds the summary event for `outcome`.
    #[must_use]
    pub fn run_completed(outcome: &RunOutcome) -> Self {
        Self::RunCompleted {
            repositories_checked: outcome.repositories_checked(),
            unapproved_pull_requests: outcome.unapproved_count(),
            scan_errors: outcome.error_count(),
            recently_public: outcome.recently_public.as_ref().map_or(0, Vec::len),
        }
    }
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

/// Picks the sink matching the `telemetry` setting.
#[must_use]
pub fn sink_for(enabled: bool) -> Box<dyn TelemetrySink> {
    if enabled {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}
