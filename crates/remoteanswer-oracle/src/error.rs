//! Oracle error types.

/// Errors that can occur when calling an oracle.
///
/// Callers normally never see these: the fail-open helpers in
/// [`crate::oracle`] log them and fall back to a safe default.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The oracle answered with nothing usable.
    #[error("empty response")]
    EmptyResponse,

    /// The oracle is not available (no-op implementation).
    #[error("oracle unavailable")]
    Unavailable,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
