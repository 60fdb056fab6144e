//! gitwarden command-line entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Utc;
use gitwarden::telemetry::{self, TelemetryEvent};
use gitwarden::{
    ConfigError, GitwardenConfig, OctocrabGateway, OutputEnvironment, RequestThrottle, RunError,
    Reporter, SlackNotifier,
};
use ortho_config::OrthoConfig;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, RunError> {
    let config = load_config()?;
    telemetry::init_logging(config.pr_debug_logging);
    let validated = config.validate()?;

    let cancel = CancellationToken::new();
    spawn_interrupt_listener(cancel.clone());

    let gateway = OctocrabGateway::for_token(
        &validated.token,
        &validated.api_base,
        RequestThrottle::new(validated.request_interval),
        cancel,
    )?;
    let outcome = gitwarden::run(&gateway, &validated, Utc::now()).await?;
    telemetry::sink_for(validated.telemetry).record(TelemetryEvent::run_completed(&outcome));

    let notifier = SlackNotifier::new()?;
    let mut reporter = Reporter::new(
        &validated.report,
        &notifier,
        OutputEnvironment::from_process(),
        io::stdout(),
    );
    reporter.deliver(&outcome).await?;

    if outcome.has_errors() {
        tracing::error!("Some repositories could not be checked");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] when ortho-config fails to parse arguments
/// or load configuration files.
fn load_config() -> Result<GitwardenConfig, ConfigError> {
    GitwardenConfig::load().map_err(|error| ConfigError::Load {
        message: error.to_string(),
    })
}

fn spawn_interrupt_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling run");
            cancel.cancel();
        }
    });
}
