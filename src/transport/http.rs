//! Retrying HTTP request executor.
//!
//! Turns one logical API call into a resilient HTTP exchange: serialize the
//! payload once, then attempt the POST up to the configured maximum, sleeping
//! per the backoff policy between attempts. Only transport-level failures
//! (connection refused, DNS failure, timeout expiry) are retried; any HTTP
//! response that arrives is returned as-is regardless of status, and status
//! interpretation is left to the caller.
//!
//! Timeout scoping: each attempt gets a fresh timeout window, enforced by
//! the underlying client's per-request timeout. Worst-case latency for a call
//! is therefore `max_retries * timeout` plus backoff sleeps.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{endpoint_url, ClientConfig, Endpoint, CONNECT_TIMEOUT};
use crate::error::{Error, Result};
use crate::transport::backoff::BackoffPolicy;
use crate::transport::headers;

/// HTTP executor with bounded, jittered retries.
pub struct HttpTransport {
    /// Client for non-streaming requests, carrying the per-attempt timeout.
    client: reqwest::Client,
    /// Client for streaming requests: connect timeout only, so a long-lived
    /// response body is never killed by a whole-request deadline.
    stream_client: reqwest::Client,
    config: Arc<ClientConfig>,
    backoff: BackoffPolicy,
}

impl HttpTransport {
    /// Create a transport from the shared client configuration.
    ///
    /// When `custom` is supplied it is used for both request modes and its
    /// own timeout settings apply.
    pub fn new(config: Arc<ClientConfig>, custom: Option<reqwest::Client>) -> Result<Self> {
        let (client, stream_client) = match custom {
            Some(client) => (client.clone(), client),
            None => {
                let client = reqwest::Client::builder()
                    .connect_timeout(CONNECT_TIMEOUT)
                    .timeout(config.timeout)
                    .build()?;
                let stream_client = reqwest::Client::builder()
                    .connect_timeout(CONNECT_TIMEOUT)
                    .build()?;
                (client, stream_client)
            }
        };

        Ok(Self {
            client,
            stream_client,
            config,
            backoff: BackoffPolicy::new(),
        })
    }

    /// Replace the backoff policy (used by tests to pin jitter).
    #[cfg(test)]
    pub(crate) fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// The shared client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST a payload with the per-attempt request timeout applied.
    pub async fn post<P: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        payload: &P,
    ) -> Result<reqwest::Response> {
        self.send_with_retry(&self.client, endpoint, payload).await
    }

    /// POST a payload for a streaming response (no whole-request timeout).
    pub async fn post_streaming<P: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        payload: &P,
    ) -> Result<reqwest::Response> {
        self.send_with_retry(&self.stream_client, endpoint, payload)
            .await
    }

    async fn send_with_retry<P: Serialize + ?Sized>(
        &self,
        client: &reqwest::Client,
        endpoint: Endpoint,
        payload: &P,
    ) -> Result<reqwest::Response> {
        // Serialization failures are fatal to the call, never retried.
        let body = serde_json::to_vec(payload)?;
        let url = endpoint_url(&self.config.base_url, endpoint);
        let hdrs = headers::request_headers(&self.config);

        let mut last_error: Option<Error> = None;

        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                let delay = self.backoff.delay(attempt - 1);
                debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying request"
                );
                tokio::time::sleep(delay).await;
            }

            match client
                .post(&url)
                .headers(hdrs.clone())
                .body(body.clone())
                .send()
                .await
            {
                Ok(response) => {
                    // Any received response ends the retry loop, even when
                    // its status indicates an API-level error.
                    debug!(
                        endpoint = endpoint.path(),
                        status = response.status().as_u16(),
                        "Received response"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    if e.is_timeout() {
                        warn!(attempt, "Request timed out");
                        last_error = Some(Error::Timeout);
                    } else {
                        warn!(attempt, error = %e, "Request failed");
                        last_error = Some(Error::Network(e));
                    }
                }
            }
        }

        Err(Error::RetriesExhausted {
            attempts: self.config.max_retries,
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts were made".into()),
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .field("backoff", &self.backoff)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT};
    use reqwest::header::HeaderMap;

    fn config_for(base_url: String, max_retries: u32) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            base_url,
            version: DEFAULT_API_VERSION.into(),
            api_key: "sk-test".into(),
            max_retries,
            timeout: DEFAULT_TIMEOUT,
            extra_headers: HeaderMap::new(),
        })
    }

    #[tokio::test]
    async fn test_successful_response_returned_first_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/complete")
            .match_header("x-api-key", "sk-test")
            .match_header("anthropic-version", DEFAULT_API_VERSION)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let transport =
            HttpTransport::new(config_for(format!("{}/", server.url()), 3), None).unwrap();
        let response = transport
            .post(Endpoint::Complete, &serde_json::json!({"prompt": "hi"}))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_received_error_status_is_never_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .with_status(500)
            .with_body(r#"{"error":{"type":"api_error","message":"boom"}}"#)
            .expect(1)
            .create_async()
            .await;

        let transport =
            HttpTransport::new(config_for(format!("{}/", server.url()), 3), None).unwrap();
        let response = transport
            .post(Endpoint::Messages, &serde_json::json!({}))
            .await
            .unwrap();

        // The executor hands back the 500 untouched; one network attempt only.
        assert_eq!(response.status().as_u16(), 500);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transport_failure_exhausts_retries() {
        // Nothing listens on this port, so every attempt fails at connect.
        let config = config_for("http://127.0.0.1:9/".into(), 2);
        let transport = HttpTransport::new(config, None)
            .unwrap()
            .with_backoff(BackoffPolicy::with_jitter_source(|| 0.0));

        let err = transport
            .post(Endpoint::Complete, &serde_json::json!({}))
            .await
            .unwrap_err();

        match err {
            Error::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extra_headers_reach_the_wire() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/complete")
            .match_header("anthropic-version", "2024-01-01")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let mut extra = HeaderMap::new();
        extra.insert(
            reqwest::header::HeaderName::from_static("anthropic-version"),
            reqwest::header::HeaderValue::from_static("2024-01-01"),
        );
        let config = Arc::new(ClientConfig {
            base_url: format!("{}/", server.url()),
            version: DEFAULT_API_VERSION.into(),
            api_key: "sk-test".into(),
            max_retries: 1,
            timeout: DEFAULT_TIMEOUT,
            extra_headers: extra,
        });

        let transport = HttpTransport::new(config, None).unwrap();
        transport
            .post(Endpoint::Complete, &serde_json::json!({}))
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
