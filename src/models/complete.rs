//! Request and response payloads for the `/complete` endpoint.

use serde::{Deserialize, Serialize};

/// Request payload for a text completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletePayload {
    /// Model identifier, see [`crate::models::model`].
    pub model: String,
    /// Prompt text; see [`Conversation`](crate::Conversation) for the
    /// expected `Human:`/`Assistant:` turn format.
    pub prompt: String,
    /// Maximum number of tokens to generate.
    pub max_tokens_to_sample: u32,
    /// Optional sampling and framing parameters.
    #[serde(flatten)]
    pub options: CompleteOptions,
}

/// Optional parameters for a completion request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Set by the call path: forced off for [`Client::complete`] and on for
    /// [`Client::complete_stream`].
    ///
    /// [`Client::complete`]: crate::Client::complete
    /// [`Client::complete_stream`]: crate::Client::complete_stream
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

/// Successful response body from `/complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteResponse {
    pub completion: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub stop_reason: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub model: String,
}

/// Decoded `data:` payload of one field-oriented SSE event.
///
/// The wire sends `null` for fields that have no value yet (notably
/// `stop_reason` mid-stream); those decode to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionEventData {
    #[serde(deserialize_with = "null_to_default")]
    pub completion: String,
    #[serde(deserialize_with = "null_to_default")]
    pub stop_reason: String,
    #[serde(deserialize_with = "null_to_default")]
    pub model: String,
    #[serde(deserialize_with = "null_to_default")]
    pub stop: String,
    #[serde(deserialize_with = "null_to_default")]
    pub log_id: String,
}

/// Decode JSON `null` as the type's default value instead of failing.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
