//! Error types for notification delivery.

use thiserror::Error;

/// Errors that can occur when delivering a report.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint asked us to slow down.
    #[error("Rate limited by endpoint")]
    RateLimited,

    /// The endpoint refused the payload.
    #[error("Endpoint rejected report with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The sink could not be set up.
    #[error("Invalid sink configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifyError::Timeout
        } else if err.is_connect() {
            NotifyError::Connection(err.to_string())
        } else {
            NotifyError::Http(err.to_string())
        }
    }
}
