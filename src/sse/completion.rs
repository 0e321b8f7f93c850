//! Field-oriented SSE decoder for the `/complete` stream.

use crate::error::{Error, Result};
use crate::models::complete::CompletionEventData;
use crate::sse::{ByteSource, LineReader};

/// One decoded event from the field-oriented framing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionEvent {
    /// Value of the last `event:` field line.
    pub event: String,
    /// JSON-decoded `data:` payload, if any.
    pub data: Option<CompletionEventData>,
    /// Last event identifier. Carries forward across events until replaced
    /// by a subsequent `id:` line; events that omit `id` keep the previous
    /// value.
    pub id: String,
    /// Reconnection delay hint from the `retry:` field.
    pub retry: i64,
}

impl CompletionEvent {
    fn is_empty(&self) -> bool {
        self.event.is_empty() && self.data.is_none() && self.id.is_empty() && self.retry == 0
    }
}

/// Stateful decoder for `field: value` SSE lines.
///
/// Field lines accumulate into the current event; a line consisting solely
/// of `\r` flushes it. Comment lines (leading `:`) and lines with no `:`
/// separator yield nothing — the latter leniency is inherited behavior and
/// is kept deliberately (the sibling [`MessageSseDecoder`] rejects such
/// lines instead).
///
/// [`MessageSseDecoder`]: crate::sse::MessageSseDecoder
pub struct CompletionSseDecoder<S> {
    lines: LineReader<S>,
    current: CompletionEvent,
}

impl<S: ByteSource> CompletionSseDecoder<S> {
    /// Decoder reading from the given byte source.
    pub fn new(source: S) -> Self {
        Self {
            lines: LineReader::new(source),
            current: CompletionEvent::default(),
        }
    }

    /// Next complete event, or `None` once the stream ends.
    pub async fn decode(&mut self) -> Result<Option<CompletionEvent>> {
        loop {
            match self.lines.next_line().await? {
                Some(line) => {
                    if let Some(event) = self.process_line(&line)? {
                        return Ok(Some(event));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    /// Fold one line into the decoder state, returning a flushed event if
    /// this line completed one.
    fn process_line(&mut self, line: &str) -> Result<Option<CompletionEvent>> {
        if line == "\r" {
            if self.current.is_empty() {
                return Ok(None);
            }
            // Reset everything except the identifier, which carries forward.
            let id = self.current.id.clone();
            let event = std::mem::replace(
                &mut self.current,
                CompletionEvent {
                    id,
                    ..CompletionEvent::default()
                },
            );
            return Ok(Some(event));
        }

        if line.starts_with(':') {
            return Ok(None);
        }

        let Some((field, value)) = line.split_once(':') else {
            // Malformed field line, dropped without error.
            return Ok(None);
        };
        let field = field.trim();
        let value = value.trim();

        match field {
            "id" => {
                if !value.contains('\0') {
                    self.current.id = value.to_string();
                }
            }
            "event" => self.current.event = value.to_string(),
            "data" => {
                let data: CompletionEventData = serde_json::from_str(value)
                    .map_err(|e| Error::Stream(format!("error decoding data field: {e}")))?;
                self.current.data = Some(data);
            }
            "retry" => {
                if let Ok(retry) = value.parse::<i64>() {
                    self.current.retry = retry;
                }
            }
            _ => {}
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::testing::Fragments;

    async fn decode_all(input: &str) -> Result<Vec<CompletionEvent>> {
        let mut decoder = CompletionSseDecoder::new(Fragments::whole(input));
        let mut events = Vec::new();
        while let Some(event) = decoder.decode().await? {
            events.push(event);
        }
        Ok(events)
    }

    #[tokio::test]
    async fn test_comment_line_yields_no_event() {
        assert_eq!(decode_all(":\n\n").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_blank_flush_with_nothing_accumulated_yields_no_event() {
        assert_eq!(decode_all("\r\n\n").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_empty_line_is_not_a_flush() {
        // Only a lone `\r` flushes; a bare newline is ignored.
        assert_eq!(decode_all("\n\n").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_junk_line_silently_ignored() {
        assert_eq!(decode_all("some junk data\n\n").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_id_field() {
        let events = decode_all("id: testID\n\r\n").await.unwrap();
        assert_eq!(
            events,
            vec![CompletionEvent {
                id: "testID".into(),
                ..CompletionEvent::default()
            }]
        );
    }

    #[tokio::test]
    async fn test_event_field() {
        let events = decode_all("event: testEvent\n\r\n").await.unwrap();
        assert_eq!(events[0].event, "testEvent");
    }

    #[tokio::test]
    async fn test_retry_field() {
        let events = decode_all("retry: 5\n\r\n").await.unwrap();
        assert_eq!(events[0].retry, 5);
    }

    #[tokio::test]
    async fn test_non_numeric_retry_ignored() {
        assert_eq!(decode_all("retry: invalid\n\n").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_data_field_decodes_json() {
        let input = concat!(
            "data: {\"completion\":\"testCompletion\",\"stop_reason\":\"testReason\",",
            "\"model\":\"testModel\",\"stop\":\"testStop\",\"log_id\":\"testLogId\"}\n\r\n"
        );
        let events = decode_all(input).await.unwrap();
        assert_eq!(
            events[0].data,
            Some(CompletionEventData {
                completion: "testCompletion".into(),
                stop_reason: "testReason".into(),
                model: "testModel".into(),
                stop: "testStop".into(),
                log_id: "testLogId".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_json_in_data_field_is_an_error() {
        let result = decode_all("data: {\"completion\":\"x\",}\n").await;
        assert!(matches!(result, Err(Error::Stream(_))));
    }

    #[tokio::test]
    async fn test_id_with_embedded_nul_is_ignored() {
        assert_eq!(decode_all("id: test\0ID\n\n").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_id_carries_forward_across_events() {
        let input = "id: first\nevent: one\n\r\nevent: two\n\r\nid: second\nevent: three\n\r\n";
        let events = decode_all(input).await.unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id, "first");
        // The second event omitted `id:` and inherits the previous value.
        assert_eq!(events[1].id, "first");
        assert_eq!(events[2].id, "second");
    }

    #[tokio::test]
    async fn test_fragmented_input_decodes_identically() {
        let mut decoder = CompletionSseDecoder::new(Fragments::new([
            "event: comp", "letion\ndata: {\"comp", "letion\":\"Hi\"}\n\r", "\n",
        ]));
        let event = decoder.decode().await.unwrap().unwrap();
        assert_eq!(event.event, "completion");
        assert_eq!(event.data.unwrap().completion, "Hi");
        assert_eq!(decoder.decode().await.unwrap(), None);
    }
}
