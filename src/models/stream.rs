//! Typed `data:` payloads for the event-name-oriented SSE framing used by
//! the `/messages` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::ErrorDetail;
use crate::models::message::Usage;

/// `message_start` payload: metadata for the message being streamed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStartData {
    #[serde(rename = "type")]
    pub event_type: String,
    pub message: StartMessage,
}

/// Partial message carried by [`MessageStartData`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub role: String,
    pub content: Vec<serde_json::Value>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub stop_sequence: Option<String>,
    pub usage: Usage,
}

/// `content_block_start` payload: a new indexed content block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlockStartData {
    #[serde(rename = "type")]
    pub event_type: String,
    pub index: usize,
    pub content_block: BlockText,
}

/// `content_block_delta` payload: a text fragment for an existing block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlockDeltaData {
    #[serde(rename = "type")]
    pub event_type: String,
    pub index: usize,
    pub delta: BlockText,
}

/// `content_block_stop` payload: the block at `index` is complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlockStopData {
    #[serde(rename = "type")]
    pub event_type: String,
    pub index: usize,
}

/// Typed text fragment inside block start/delta payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockText {
    #[serde(rename = "type")]
    pub text_type: String,
    pub text: String,
}

/// `message_delta` payload: top-level changes to the final message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageDeltaData {
    #[serde(rename = "type")]
    pub event_type: String,
    pub delta: serde_json::Value,
    pub usage: DeltaUsage,
}

/// Output-token count carried by `message_delta`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaUsage {
    pub output_tokens: u32,
}

/// `ping` keepalive payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingData {
    #[serde(rename = "type")]
    pub event_type: String,
}

/// `message_stop` payload: the terminal event of a stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStopData {
    #[serde(rename = "type")]
    pub event_type: String,
}

/// `error` payload: an in-band remote failure that aborts the stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorEventData {
    #[serde(rename = "type")]
    pub event_type: String,
    pub error: ErrorDetail,
}
