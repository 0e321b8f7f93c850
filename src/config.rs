//! Configuration defaults and endpoint routing for the Anthropic API.

use std::time::Duration;

use reqwest::header::HeaderMap;

/// Default API base URL. Endpoint paths are appended directly.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/";

/// Default `anthropic-version` protocol header value.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Environment variable consulted when no API key is configured explicitly.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Maximum number of network attempts per logical call.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Per-attempt timeout for non-streaming requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connect timeout for all requests, including streaming.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fraction of the base backoff delay added as random jitter.
pub const JITTER_FACTOR: f64 = 0.5;

/// API endpoint kinds served by one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Legacy text completion endpoint (`/complete`).
    Complete,
    /// Messages endpoint (`/messages`).
    Messages,
}

impl Endpoint {
    /// Path segment appended to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Complete => "complete",
            Endpoint::Messages => "messages",
        }
    }
}

/// Returns the full URL for an endpoint under the given base URL.
///
/// The base URL is expected to end with `/` (the client builder normalizes
/// this).
pub fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}{}", base_url, endpoint.path())
}

/// Immutable per-client configuration, shared read-only across all requests
/// issued by one [`Client`](crate::Client) instance.
pub struct ClientConfig {
    /// Base endpoint URL, always `/`-terminated.
    pub base_url: String,
    /// `anthropic-version` header value.
    pub version: String,
    /// Credential sent via the `x-api-key` header.
    pub(crate) api_key: String,
    /// Maximum network attempts per call.
    pub max_retries: u32,
    /// Per-attempt timeout for non-streaming requests.
    pub timeout: Duration,
    /// Extra headers applied after the defaults, so they may override them.
    pub extra_headers: HeaderMap,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .field("extra_headers", &self.extra_headers)
            .finish()
    }
}
