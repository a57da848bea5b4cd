//! Error types for reqwest-based cluster calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The endpoint could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// The cluster answered with a non-success status.
    #[error("cluster returned {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Error type reported by the cluster, or the raw body.
        reason: String,
    },
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    crate::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else {
                    crate::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => crate::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => crate::Error::invalid_input()
                .with_message(e.to_string())
                .with_source(e),
            Error::Status { status, reason } => {
                let error = match status {
                    StatusCode::BAD_REQUEST if reason.contains("already_exists") => {
                        crate::Error::already_exists()
                    }
                    StatusCode::BAD_REQUEST => crate::Error::invalid_input(),
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        crate::Error::authentication()
                    }
                    StatusCode::NOT_FOUND => crate::Error::not_found(),
                    StatusCode::TOO_MANY_REQUESTS => crate::Error::rate_limited(),
                    StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                        crate::Error::timeout()
                    }
                    StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
                        crate::Error::service_unavailable()
                    }
                    _ => crate::Error::external_error(),
                };
                error.with_message(format!("{status}: {reason}"))
            }
        }
    }
}
