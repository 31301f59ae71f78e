//! Error types for page fetching and refresh cycles

use thiserror::Error;

/// Failure of a single page request.
#[derive(Debug, Error)]
pub enum PageError {
    /// Connection, timeout or body read failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success status
    #[error("API returned status {status}")]
    Status { status: u16 },

    /// Body was not the expected JSON shape
    #[error("decode failed: {0}")]
    Decode(String),

    /// The HTTP session was released on teardown
    #[error("HTTP session closed")]
    SessionClosed,
}

impl PageError {
    /// Recoverable errors end pagination for one direction; the rest fail the cycle.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PageError::SessionClosed)
    }
}

/// A refresh cycle produced no update. The previous result stays on display.
#[derive(Debug, Error)]
#[error("Error communicating with HTX API: {0}")]
pub struct UpdateFailed(pub String);
