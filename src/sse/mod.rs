//! Incremental SSE decoding.
//!
//! Two wire framings exist in this protocol family and they are parsed by
//! two distinct decoders rather than one unified state machine, because
//! their field semantics genuinely differ:
//!
//! - [`CompletionSseDecoder`] (the `/complete` stream) is field-oriented:
//!   `id`/`event`/`data`/`retry` lines accumulate until a blank line flushes
//!   the event, and the `id` field carries forward across events.
//! - [`MessageSseDecoder`] (the `/messages` stream) is event-name-oriented:
//!   an `event:` line is immediately followed by its `data:` lines, decoded
//!   through a dispatch table keyed by event name. It supports neither `id`
//!   nor `retry`.
//!
//! Both decoders sit on [`LineReader`], which reassembles logical lines from
//! a byte stream delivered in arbitrarily-fragmented chunks.

pub mod completion;
pub mod message;

pub use completion::{CompletionEvent, CompletionSseDecoder};
pub use message::{DecodeOptions, EventData, EventPayload, MessageEvent, MessageSseDecoder};

use crate::error::{Error, Result};

/// Source of raw response-body bytes, typically an HTTP response.
pub trait ByteSource {
    /// Next chunk of bytes; `None` signals clean end of stream.
    fn next_chunk(&mut self) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
}

impl ByteSource for reqwest::Response {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self.chunk().await {
            Ok(Some(chunk)) => Ok(Some(chunk.to_vec())),
            Ok(None) => Ok(None),
            Err(e) if e.is_timeout() => Err(Error::Timeout),
            Err(e) => Err(Error::Network(e)),
        }
    }
}

/// Reassembles `\n`-terminated lines from fragmented byte chunks.
///
/// Lines are yielded without their trailing `\n` but with any `\r` kept, so
/// the decoders can distinguish `\r\n` flush lines from truly empty lines.
/// A trailing fragment not terminated by a newline when the source ends is
/// discarded; every well-formed SSE event ends in a blank line, so such a
/// fragment can never complete an event.
pub(crate) struct LineReader<S> {
    source: S,
    buffer: Vec<u8>,
    done: bool,
}

impl<S: ByteSource> LineReader<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Next logical line, or `None` at clean end of stream.
    pub(crate) async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
                line.pop(); // trailing \n
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            if self.done {
                return Ok(None);
            }

            match self.source.next_chunk().await? {
                Some(chunk) => self.buffer.extend_from_slice(&chunk),
                None => self.done = true,
            }
        }
    }
}
