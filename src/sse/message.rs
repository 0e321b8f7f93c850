//! Event-name-oriented SSE decoder for the `/messages` stream.

use tracing::trace;

use crate::error::{Error, Result};
use crate::models::stream::{
    ContentBlockDeltaData, ContentBlockStartData, ContentBlockStopData, ErrorEventData,
    MessageDeltaData, MessageStartData, MessageStopData, PingData,
};
use crate::sse::{ByteSource, LineReader};

/// Terminal event name; always surfaced, even under `content_only`.
pub(crate) const MESSAGE_STOP: &str = "message_stop";

/// Per-call decode filter.
///
/// This filters which events are surfaced to the caller; it never affects
/// content accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Surface only events carrying non-empty extracted content, plus the
    /// terminal `message_stop` event so a read loop always sees the end.
    pub content_only: bool,
}

/// One decoded event from the event-name-oriented framing.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    /// Event name from the `event:` line.
    pub event: String,
    /// Decoded payload and extracted content.
    pub data: EventData,
}

/// Payload of a [`MessageEvent`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventData {
    /// Text fragment extracted from block start/delta events, empty for all
    /// other event kinds.
    pub content: String,
    /// Typed payload; `None` for unrecognized event names.
    pub payload: Option<EventPayload>,
}

/// Closed union of the known event payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    MessageStart(MessageStartData),
    ContentBlockStart(ContentBlockStartData),
    ContentBlockDelta(ContentBlockDeltaData),
    ContentBlockStop(ContentBlockStopData),
    MessageDelta(MessageDeltaData),
    MessageStop(MessageStopData),
    Ping(PingData),
}

/// Stateful decoder for `event:`-led SSE framing.
///
/// Upon an `event:` line the decoder immediately consumes the following
/// `data:` lines until a blank line, decoding them through a dispatch table
/// keyed by the event name. Text fragments from `content_block_start` and
/// `content_block_delta` are folded into an index-addressed content buffer
/// that lives as long as the decoder.
pub struct MessageSseDecoder<S> {
    lines: LineReader<S>,
    content: Vec<String>,
}

impl<S: ByteSource> MessageSseDecoder<S> {
    /// Decoder reading from the given byte source.
    pub fn new(source: S) -> Self {
        Self {
            lines: LineReader::new(source),
            content: Vec::new(),
        }
    }

    /// Accumulated content blocks, dense by block index.
    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// Next event, or `None` once the stream ends.
    ///
    /// At most one [`DecodeOptions`] value may be supplied; passing more is
    /// a usage error rejected before any line is read. An in-band `error`
    /// event aborts with [`Error::Stream`] and the caller must stop reading.
    pub async fn decode(&mut self, opts: &[DecodeOptions]) -> Result<Option<MessageEvent>> {
        let options = match opts {
            [] => DecodeOptions::default(),
            [single] => *single,
            _ => {
                return Err(Error::InvalidOptions(
                    "too many options provided, expected at most one".into(),
                ))
            }
        };

        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                return Err(Error::Stream("invalid SSE format".into()));
            };
            let field = field.trim();
            let value = value.trim();

            if field != "event" {
                trace!(field, "Skipping non-event field line");
                continue;
            }

            let data = self.decode_data(value).await?;
            if !data.content.is_empty() || !options.content_only || value == MESSAGE_STOP {
                return Ok(Some(MessageEvent {
                    event: value.to_string(),
                    data,
                }));
            }
        }
    }

    /// Consume the `data:` lines following an `event:` line.
    ///
    /// Stops at a blank line or read failure; only the in-band `error` event
    /// turns a mid-stream condition into a hard failure.
    async fn decode_data(&mut self, event: &str) -> Result<EventData> {
        let mut data = EventData::default();

        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) | Err(_) => break,
            };

            let line = line.trim();
            if line.is_empty() {
                break;
            }

            let Some(json) = line.strip_prefix("data:") else {
                continue;
            };
            let json = json.trim();

            match event {
                "message_start" => {
                    let payload: MessageStartData = serde_json::from_str(json)?;
                    data.payload = Some(EventPayload::MessageStart(payload));
                }
                "content_block_start" => {
                    let payload: ContentBlockStartData = serde_json::from_str(json)?;
                    data.content = payload.content_block.text.clone();
                    self.update_content(payload.index, &payload.content_block.text);
                    data.payload = Some(EventPayload::ContentBlockStart(payload));
                }
                "content_block_delta" => {
                    let payload: ContentBlockDeltaData = serde_json::from_str(json)?;
                    data.content = payload.delta.text.clone();
                    self.update_content(payload.index, &payload.delta.text);
                    data.payload = Some(EventPayload::ContentBlockDelta(payload));
                }
                "content_block_stop" => {
                    let payload: ContentBlockStopData = serde_json::from_str(json)?;
                    data.payload = Some(EventPayload::ContentBlockStop(payload));
                }
                "message_delta" => {
                    let payload: MessageDeltaData = serde_json::from_str(json)?;
                    data.payload = Some(EventPayload::MessageDelta(payload));
                }
                MESSAGE_STOP => {
                    let payload: MessageStopData = serde_json::from_str(json)?;
                    data.payload = Some(EventPayload::MessageStop(payload));
                }
                "ping" => {
                    let payload: PingData = serde_json::from_str(json)?;
                    data.payload = Some(EventPayload::Ping(payload));
                }
                "error" => {
                    let payload: ErrorEventData = serde_json::from_str(json)?;
                    return Err(Error::Stream(format!(
                        "error({}) -  {}",
                        payload.error.error_type, payload.error.message
                    )));
                }
                other => {
                    // Unknown event names carry no typed payload.
                    trace!(event = other, "Unrecognized event name");
                }
            }
        }

        Ok(data)
    }

    /// Append a fragment to the block at `index`, creating any missing
    /// slots `[len..index]` as empty strings first.
    fn update_content(&mut self, index: usize, fragment: &str) {
        if index >= self.content.len() {
            self.content.resize(index + 1, String::new());
        }
        self.content[index].push_str(fragment);
    }
}
