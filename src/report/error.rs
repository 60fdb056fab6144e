//! Errors raised while delivering a report.

use thiserror::Error;

/// Report delivery failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The Slack webhook does not use HTTPS.
    #[error("invalid Slack webhook URL: URL must begin with https://")]
    InsecureWebhook,

    /// The Slack webhook could not be reached or rejected the payload.
    #[error("failed to send report to Slack: {message}")]
    Slack {
        /// Transport or status description.
        message: String,
    },

    /// Neither the report path nor its fallback could be written.
    #[error("failed to write report to {path}: {message}")]
    Write {
        /// Last path attempted.
        path: String,
        /// I/O error description.
        message: String,
    },

    /// Writing to standard output failed.
    #[error("failed to write report output: {message}")]
    Io {
        /// I/O error description.
        message: String,
    },
}

impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
