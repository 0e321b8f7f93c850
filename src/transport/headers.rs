//! Protocol header construction for API requests.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::config::ClientConfig;

/// Header carrying the API protocol version.
pub const VERSION_HEADER: &str = "anthropic-version";

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Build the headers for one API request.
///
/// Defaults (content negotiation, protocol version, credential) are set
/// first; configured extra headers are applied afterwards and therefore
/// override the defaults on name collision.
pub fn request_headers(config: &ClientConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    headers.insert(
        VERSION_HEADER,
        HeaderValue::from_str(&config.version)
            .unwrap_or_else(|_| HeaderValue::from_static(crate::config::DEFAULT_API_VERSION)),
    );

    headers.insert(
        API_KEY_HEADER,
        HeaderValue::from_str(&config.api_key)
            .unwrap_or_else(|_| HeaderValue::from_static("invalid")),
    );

    for (name, value) in &config.extra_headers {
        headers.insert(name.clone(), value.clone());
    }

    headers
}
