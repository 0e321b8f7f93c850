//! # anthropic-gateway
//!
//! Rust client library for the Anthropic text generation API.
//!
//! Covers the legacy `/complete` endpoint and the `/messages` endpoint, both
//! as single-shot calls and as incrementally streamed responses decoded from
//! Server-Sent Events. Requests go through a retrying executor with bounded,
//! jittered backoff; only transport-level failures are retried, never a
//! response that actually arrived.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use anthropic_gateway::{Client, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::builder().build()?; // reads ANTHROPIC_API_KEY
//!
//!     let response = client.messages()
//!         .model(anthropic_gateway::models::model::CLAUDE_3_SONNET)
//!         .max_tokens(1024)
//!         .user_message("Hello!")
//!         .send()
//!         .await?;
//!
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! # use anthropic_gateway::{Client, DecodeOptions, Result};
//! # async fn example(client: &Client) -> Result<()> {
//! let mut stream = client.messages()
//!     .model(anthropic_gateway::models::model::CLAUDE_3_SONNET)
//!     .max_tokens(1024)
//!     .user_message("Hello!")
//!     .send_stream()
//!     .await?;
//!
//! let opts = [DecodeOptions { content_only: true }];
//! while let Some(event) = stream.decode(&opts).await? {
//!     print!("{}", event.data.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod models;
pub mod sse;
pub mod transport;

// Re-exports for ergonomic usage
pub use api::complete::CompleteStream;
pub use api::messages::{MessageStream, MessagesRequestBuilder};
pub use client::{Client, ClientBuilder};
pub use conversation::{Conversation, Speaker};
pub use error::{Error, Result};
pub use models::complete::{
    CompleteOptions, CompletePayload, CompleteResponse, CompletionEventData,
};
pub use models::message::{
    ContentBlock, Message, MessageContent, MessagesRequest, MessagesResponse, Metadata, Role,
    Usage,
};
pub use sse::{
    CompletionEvent, CompletionSseDecoder, DecodeOptions, EventData, EventPayload, MessageEvent,
    MessageSseDecoder,
};
