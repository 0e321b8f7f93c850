//! Error types for the Anthropic gateway.

use serde::{Deserialize, Serialize};

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by this crate.
///
/// The taxonomy distinguishes transport failures (no HTTP response received;
/// retried by the executor) from API errors (a response was received with a
/// non-success status; never retried) and stream decode errors (fatal to the
/// decode call in progress).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No API key was provided and the environment fallback was unset.
    #[error("API key not provided and not found in environment")]
    MissingApiKey,

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport-level failure before any HTTP response arrived.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The per-attempt timeout expired.
    #[error("Request timed out")]
    Timeout,

    /// All retry attempts failed at the transport level.
    #[error("request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The API returned a non-success status with a wire error body.
    ///
    /// Displays as the composed `"{type}: {message}"` string from the wire
    /// error shape.
    #[error("{error_type}: {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    /// Request payload or response body (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed SSE framing, malformed per-event JSON, or an in-band
    /// remote error event.
    #[error("{0}")]
    Stream(String),

    /// Caller usage error in decode options.
    #[error("invalid decode options: {0}")]
    InvalidOptions(String),
}

/// Wire shape of a non-2xx JSON error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error type and message within an [`ErrorResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_composed_wire_message() {
        let err = Error::Api {
            status: 400,
            error_type: "invalid_request_error".into(),
            message: "max_tokens_to_sample is required".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid_request_error: max_tokens_to_sample is required"
        );
    }

    #[test]
    fn test_error_response_deserializes_wire_shape() {
        let body = r#"{"error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.error_type, "overloaded_error");
        assert_eq!(parsed.error.message, "Overloaded");
    }
}
