//! Fetch error types.

use thiserror::Error;

/// Error type for remote API operations.
///
/// Three-way classification drives scheduler policy:
/// - [`FetchError::Auth`] requires human re-entry and is never auto-retried.
/// - [`FetchError::Connection`] and [`FetchError::Api`] are transient and
///   retried on the next tick, with no extra backoff.
///
/// [`FetchError::Config`] can only occur while constructing a client and
/// never escapes a refresh cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Credentials rejected (HTTP 401/403).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure (DNS, timeout, connection reset).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Unexpected status or malformed response body.
    #[error("API error: {0}")]
    Api(String),

    /// Invalid client configuration (bad base URL, unbuildable client).
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// Returns true if this error requires credential re-entry.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Returns true if the next scheduled tick may succeed without human
    /// intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Api(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_decode() {
            Self::Api(format!("malformed response body: {err}"))
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            // Remaining reqwest errors (request aborted, body streaming,
            // redirect loops) are transport-level from our point of view.
            Self::Connection(err.to_string())
        }
    }
}
