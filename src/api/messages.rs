//! Call paths and fluent builder for the `/messages` endpoint.

use async_stream::try_stream;
use futures::Stream;
use tracing::debug;

use crate::config::Endpoint;
use crate::error::Result;
use crate::models::message::{
    ContentBlock, Message, MessageContent, MessagesRequest, MessagesResponse, Metadata, Role,
};
use crate::sse::{DecodeOptions, MessageEvent, MessageSseDecoder};
use crate::transport::HttpTransport;

/// Send a messages request and read the full response body.
pub(crate) async fn send_messages(
    transport: &HttpTransport,
    mut request: MessagesRequest,
) -> Result<MessagesResponse> {
    request.stream = Some(false);

    debug!(model = request.model.as_str(), "Sending messages request");
    let response = transport.post(Endpoint::Messages, &request).await?;
    let response = super::check_response(response).await?;

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Send a messages request and hand back the SSE stream.
pub(crate) async fn send_messages_stream(
    transport: &HttpTransport,
    mut request: MessagesRequest,
) -> Result<MessageStream> {
    request.stream = Some(true);

    debug!(
        model = request.model.as_str(),
        "Sending streaming messages request"
    );
    let response = transport.post_streaming(Endpoint::Messages, &request).await?;
    let response = super::check_response(response).await?;

    Ok(MessageStream {
        decoder: MessageSseDecoder::new(response),
    })
}

/// An in-flight streaming message.
///
/// Owns the response body; dropping the stream releases the connection, so
/// early abandonment needs no explicit cancel step. Content blocks
/// accumulate inside the decoder for the lifetime of the stream and remain
/// readable between decode calls.
pub struct MessageStream {
    decoder: MessageSseDecoder<reqwest::Response>,
}

impl MessageStream {
    /// Next event, or `None` once the stream ends.
    ///
    /// At most one [`DecodeOptions`] value may be supplied per call.
    pub async fn decode(&mut self, opts: &[DecodeOptions]) -> Result<Option<MessageEvent>> {
        self.decoder.decode(opts).await
    }

    /// Accumulated content blocks so far, dense by block index.
    pub fn content(&self) -> &[String] {
        self.decoder.content()
    }

    /// Concatenated text of all accumulated blocks.
    pub fn text(&self) -> String {
        self.decoder.content().join("")
    }

    /// Adapt the pull decoder into a [`futures::Stream`] of events, applying
    /// `options` to every decode step.
    pub fn into_stream(
        mut self,
        options: DecodeOptions,
    ) -> impl Stream<Item = Result<MessageEvent>> + Send {
        try_stream! {
            while let Some(event) = self.decoder.decode(&[options]).await? {
                yield event;
            }
        }
    }
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStream")
            .field("content_blocks", &self.decoder.content().len())
            .finish_non_exhaustive()
    }
}

/// Fluent builder for Messages API requests.
///
/// ```rust,no_run
/// # use anthropic_gateway::Client;
/// # async fn example(client: &Client) -> anthropic_gateway::Result<()> {
/// let response = client.messages()
///     .model(anthropic_gateway::models::model::CLAUDE_3_SONNET)
///     .max_tokens(1024)
///     .user_message("Hello!")
///     .send()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct MessagesRequestBuilder<'a> {
    client: &'a crate::client::Client,
    request: MessagesRequest,
}

impl<'a> MessagesRequestBuilder<'a> {
    pub(crate) fn new(client: &'a crate::client::Client) -> Self {
        Self {
            client,
            request: MessagesRequest {
                model: crate::models::model::CLAUDE_3_SONNET.to_string(),
                messages: Vec::new(),
                max_tokens: 4096,
                stop_sequences: None,
                temperature: None,
                top_p: None,
                top_k: None,
                metadata: None,
                system: None,
                stream: None,
            },
        }
    }

    /// Set the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.request.model = model.into();
        self
    }

    /// Set the maximum number of tokens to generate.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.request.max_tokens = max_tokens;
        self
    }

    /// Set the system prompt.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.request.system = Some(system.into());
        self
    }

    /// Add a user message (plain text).
    pub fn user_message(mut self, content: impl Into<String>) -> Self {
        self.request.messages.push(Message {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        });
        self
    }

    /// Add an assistant message (for multi-turn conversations).
    pub fn assistant_message(mut self, content: impl Into<String>) -> Self {
        self.request.messages.push(Message {
            role: Role::Assistant,
            content: MessageContent::Text(content.into()),
        });
        self
    }

    /// Add a message with typed content blocks (for images etc.).
    pub fn message(mut self, role: Role, blocks: Vec<ContentBlock>) -> Self {
        self.request.messages.push(Message {
            role,
            content: MessageContent::Blocks(blocks),
        });
        self
    }

    /// Replace the full messages list.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.request.temperature = Some(temperature);
        self
    }

    /// Set nucleus sampling.
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.request.top_p = Some(top_p);
        self
    }

    /// Sample only from the top K options per token.
    pub fn top_k(mut self, top_k: i32) -> Self {
        self.request.top_k = Some(top_k);
        self
    }

    /// Set stop sequences.
    pub fn stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.request.stop_sequences = Some(sequences);
        self
    }

    /// Attach request metadata.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.request.metadata = Some(metadata);
        self
    }

    /// Send the request and read the complete response.
    pub async fn send(self) -> Result<MessagesResponse> {
        self.client.send_messages(self.request).await
    }

    /// Send the request and hand back the SSE stream.
    pub async fn send_stream(self) -> Result<MessageStream> {
        self.client.send_messages_stream(self.request).await
    }

    /// Return the built request without sending it.
    pub fn build(self) -> MessagesRequest {
        self.request
    }
}
