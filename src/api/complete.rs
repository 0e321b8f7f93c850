//! Call paths for the `/complete` endpoint.

use async_stream::try_stream;
use futures::Stream;
use tracing::debug;

use crate::config::Endpoint;
use crate::error::Result;
use crate::models::complete::{CompletePayload, CompleteResponse};
use crate::sse::{CompletionEvent, CompletionSseDecoder};
use crate::transport::HttpTransport;

/// Send a completion request and read the full response body.
pub(crate) async fn complete(
    transport: &HttpTransport,
    mut payload: CompletePayload,
) -> Result<CompleteResponse> {
    payload.options.stream = false;

    debug!(model = payload.model.as_str(), "Sending complete request");
    let response = transport.post(Endpoint::Complete, &payload).await?;
    let response = super::check_response(response).await?;

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Send a completion request and hand back the SSE stream.
pub(crate) async fn complete_stream(
    transport: &HttpTransport,
    mut payload: CompletePayload,
) -> Result<CompleteStream> {
    payload.options.stream = true;

    debug!(
        model = payload.model.as_str(),
        "Sending streaming complete request"
    );
    let response = transport.post_streaming(Endpoint::Complete, &payload).await?;
    let response = super::check_response(response).await?;

    Ok(CompleteStream {
        decoder: CompletionSseDecoder::new(response),
    })
}

/// An in-flight streaming completion.
///
/// Owns the response body; dropping the stream releases the connection, so
/// early abandonment needs no explicit cancel step.
pub struct CompleteStream {
    decoder: CompletionSseDecoder<reqwest::Response>,
}

impl CompleteStream {
    /// Next event, or `None` once the stream ends.
    pub async fn decode(&mut self) -> Result<Option<CompletionEvent>> {
        self.decoder.decode().await
    }

    /// Adapt the pull decoder into a [`futures::Stream`] of events.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<CompletionEvent>> + Send {
        try_stream! {
            while let Some(event) = self.decoder.decode().await? {
                yield event;
            }
        }
    }
}

impl std::fmt::Debug for CompleteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompleteStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::models::complete::{CompletePayload, CompleteOptions};
    use crate::{Client, Conversation, Speaker};

    fn test_client(server: &mockito::ServerGuard) -> Client {
        Client::builder()
            .api_key("sk-test")
            .base_url(server.url())
            .max_retries(1)
            .build()
            .unwrap()
    }

    fn test_payload() -> CompletePayload {
        let mut conversation = Conversation::new();
        conversation.add_message(Speaker::Human, "Hi");
        CompletePayload {
            model: crate::models::model::CLAUDE_2.into(),
            prompt: conversation.generate_prompt(),
            max_tokens_to_sample: 256,
            options: CompleteOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_complete_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/complete")
            .match_header("x-api-key", "sk-test")
            .with_status(200)
            .with_body(
                r#"{"completion":" Hello there","stop_reason":"stop_sequence","model":"claude-2"}"#,
            )
            .create_async()
            .await;

        let response = test_client(&server).complete(test_payload()).await.unwrap();
        assert_eq!(response.completion, " Hello there");
        assert_eq!(response.stop_reason, "stop_sequence");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_surfaced_as_composed_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/complete")
            .with_status(400)
            .with_body(r#"{"error":{"type":"invalid_request_error","message":"prompt is required"}}"#)
            .create_async()
            .await;

        let err = test_client(&server)
            .complete(test_payload())
            .await
            .unwrap_err();
        match err {
            Error::Api { status, .. } => {
                assert_eq!(status, 400);
                assert_eq!(err.to_string(), "invalid_request_error: prompt is required");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_error_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/complete")
            .with_status(500)
            .with_body("not json")
            .create_async()
            .await;

        let err = test_client(&server)
            .complete(test_payload())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_streaming_completion_decodes_events() {
        let body = "\
event: completion\r\n\
data: {\"completion\": \" Hello\", \"stop_reason\": null, \"model\": \"claude-2\"}\r\n\
\r\n\
event: completion\r\n\
data: {\"completion\": \"!\", \"stop_reason\": \"stop_sequence\", \"model\": \"claude-2\"}\r\n\
\r\n";
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/complete")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let mut stream = test_client(&server)
            .complete_stream(test_payload())
            .await
            .unwrap();

        let first = stream.decode().await.unwrap().unwrap();
        assert_eq!(first.event, "completion");
        assert_eq!(first.data.as_ref().unwrap().completion, " Hello");

        let second = stream.decode().await.unwrap().unwrap();
        assert_eq!(second.data.as_ref().unwrap().completion, "!");
        assert_eq!(second.data.as_ref().unwrap().stop_reason, "stop_sequence");

        assert!(stream.decode().await.unwrap().is_none());
    }
}
