//! Error types for the extraction session.

use thiserror::Error;

/// Errors raised while driving the rendering session.
///
/// These never leave the [`Extractor`](super::Extractor); they decide
/// whether the session is torn down and are logged.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The browser session could not be created.
    #[error("Session setup failed: {0}")]
    Launch(String),

    /// Timed out waiting for an element.
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// The page has no element matching the locator.
    #[error("No element matches {0}")]
    MissingElement(String),

    /// Any other failure of the session (detached, crashed, transport error).
    #[error("Session failed: {0}")]
    Session(String),
}

impl From<fantoccini::error::NewSessionError> for ExtractError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        ExtractError::Launch(err.to_string())
    }
}

impl From<fantoccini::error::CmdError> for ExtractError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        ExtractError::Session(err.to_string())
    }
}
