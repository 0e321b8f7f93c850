//! Endpoint call paths built on the transport executor.

pub mod complete;
pub mod messages;

pub use complete::CompleteStream;
pub use messages::{MessageStream, MessagesRequestBuilder};

use crate::error::{Error, ErrorResponse, Result};

/// Pass 2xx responses through; decode the wire error shape otherwise.
///
/// The status has already survived the retry loop, so a failure here is an
/// API error, never a transport one. A malformed error body surfaces as a
/// JSON decode error.
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.bytes().await?;
    let wire: ErrorResponse = serde_json::from_slice(&body)?;

    Err(Error::Api {
        status,
        error_type: wire.error.error_type,
        message: wire.error.message,
    })
}
