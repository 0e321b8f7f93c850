//! Main client entry point.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::info;

use crate::api::complete::CompleteStream;
use crate::api::messages::{MessageStream, MessagesRequestBuilder};
use crate::config::{
    ClientConfig, API_KEY_ENV, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT,
};
use crate::error::{Error, Result};
use crate::models::complete::{CompletePayload, CompleteResponse};
use crate::models::message::{MessagesRequest, MessagesResponse};
use crate::transport::HttpTransport;

/// Anthropic API client.
///
/// Covers both the legacy `/complete` endpoint and the `/messages` endpoint,
/// each in single-shot and streaming form. The configuration is immutable
/// after [`build`](ClientBuilder::build), so one client may serve concurrent
/// calls; every call keeps its own retry and decode state.
///
/// # Examples
///
/// ```rust,no_run
/// use anthropic_gateway::{Client, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     // Falls back to the ANTHROPIC_API_KEY environment variable.
///     let client = Client::builder().build()?;
///
///     let response = client.messages()
///         .model(anthropic_gateway::models::model::CLAUDE_3_SONNET)
///         .max_tokens(1024)
///         .user_message("Hello!")
///         .send()
///         .await?;
///
///     println!("{}", response.text());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<HttpTransport>,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Start building a Messages API request.
    pub fn messages(&self) -> MessagesRequestBuilder<'_> {
        MessagesRequestBuilder::new(self)
    }

    /// The resolved client configuration.
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Send a completion request and read the full response.
    ///
    /// Streaming is forced off regardless of the payload's `stream` option.
    pub async fn complete(&self, payload: CompletePayload) -> Result<CompleteResponse> {
        crate::api::complete::complete(&self.transport, payload).await
    }

    /// Send a completion request with streaming enabled.
    ///
    /// Drive the returned [`CompleteStream`] one event at a time; dropping
    /// it releases the connection.
    pub async fn complete_stream(&self, payload: CompletePayload) -> Result<CompleteStream> {
        crate::api::complete::complete_stream(&self.transport, payload).await
    }

    /// Send a messages request and read the full response.
    pub async fn send_messages(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        crate::api::messages::send_messages(&self.transport, request).await
    }

    /// Send a messages request with streaming enabled.
    pub async fn send_messages_stream(&self, request: MessagesRequest) -> Result<MessageStream> {
        crate::api::messages::send_messages_stream(&self.transport, request).await
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    version: Option<String>,
    max_retries: Option<u32>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
    reqwest_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            version: None,
            max_retries: None,
            timeout: None,
            headers: Vec::new(),
            reqwest_client: None,
        }
    }

    /// Set the API key explicitly, bypassing the environment fallback.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the `anthropic-version` protocol header.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the maximum number of network attempts per call.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the per-attempt timeout for non-streaming requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add an extra header sent with every request. Extra headers are
    /// applied after the defaults and may override them.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Supply a custom reqwest client; its own timeouts then apply to both
    /// request modes.
    pub fn reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.reqwest_client = Some(client);
        self
    }

    /// Build the client, resolving and validating the configuration.
    ///
    /// Fails with [`Error::MissingApiKey`] when no key was set and the
    /// `ANTHROPIC_API_KEY` environment variable is unset.
    pub fn build(self) -> Result<Client> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var(API_KEY_ENV).map_err(|_| Error::MissingApiKey)?,
        };

        let mut base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let mut extra_headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::Config(format!("invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::Config(format!("invalid value for header {name:?}")))?;
            extra_headers.insert(name, value);
        }

        let config = Arc::new(ClientConfig {
            base_url,
            version: self.version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            api_key,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            extra_headers,
        });

        let transport = HttpTransport::new(config, self.reqwest_client)?;

        info!("Client initialized");
        Ok(Client {
            transport: Arc::new(transport),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is kept inside a single test to avoid races
    // between parallel test threads.
    #[test]
    fn test_api_key_resolution() {
        // Explicit key wins regardless of the environment.
        std::env::set_var(API_KEY_ENV, "sk-from-env");
        assert!(ClientBuilder::new().api_key("sk-explicit").build().is_ok());

        // Environment fallback.
        assert!(ClientBuilder::new().build().is_ok());

        // Neither source present is a hard failure.
        std::env::remove_var(API_KEY_ENV);
        assert!(matches!(
            ClientBuilder::new().build(),
            Err(Error::MissingApiKey)
        ));
    }

    #[test]
    fn test_base_url_is_slash_terminated() {
        let client = ClientBuilder::new()
            .api_key("sk-test")
            .base_url("http://localhost:8080/v1")
            .build()
            .unwrap();
        assert_eq!(client.config().base_url, "http://localhost:8080/v1/");
    }

    #[test]
    fn test_invalid_extra_header_rejected() {
        let result = ClientBuilder::new()
            .api_key("sk-test")
            .header("bad header name", "value")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
