//! Error types for the Chatterbox TTS provider.
//!
//! Centralized error handling for configuration, connectivity, and
//! synthesis failures. Remote-call failures are caught at the provider
//! boundary and converted into fallback/sentinel outcomes; nothing in
//! this crate propagates a panic or an unhandled error into the hosting
//! platform.

use thiserror::Error;

/// Result type for Chatterbox TTS operations
pub type TtsResult<T> = Result<T, TtsError>;

/// Error type for the Chatterbox TTS provider
#[derive(Error, Debug)]
pub enum TtsError {
    /// Configuration is malformed or a parameter is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The Chatterbox server could not be reached at setup time
    #[error("Failed to connect to Chatterbox TTS server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// A network-level failure while talking to the server
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The server answered with a non-success status code
    #[error("Chatterbox TTS API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// The server response body could not be decoded
    #[error("Failed to parse server response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TtsError::NetworkError(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            TtsError::NetworkError(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            TtsError::InvalidResponse(err.to_string())
        } else {
            TtsError::NetworkError(err.to_string())
        }
    }
}
