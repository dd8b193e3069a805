//! Incremental frame decoding.
//!
//! The wire carries UTF-8 text lines; a record is a single line starting
//! with the `data:` prefix whose payload is a JSON event. Chunk boundaries
//! fall anywhere, including inside a multi-byte character or inside the
//! prefix itself, so the decoder carries two buffers across calls: the
//! undecodable byte tail of an incomplete code point, and the text of an
//! incomplete line. Nothing is emitted until it is whole, and nothing is
//! dropped while more bytes may arrive.

use std::mem;

use crate::error::{StreamError, StreamResult};
use crate::events::{Decoded, StreamEvent};

/// The fixed prefix marking a candidate record line.
pub const RECORD_PREFIX: &str = "data:";

const MAX_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Stateful chunk-to-event decoder.
///
/// Feed arbitrary byte chunks in arrival order, then call
/// [`finish`](Self::finish) once the source reports completion. The decoded
/// event sequence is identical for any re-chunking of the same bytes.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Trailing bytes of an incomplete UTF-8 code point.
    byte_carry: Vec<u8>,
    /// Text after the last line boundary seen so far.
    line_carry: String,
}

impl FrameDecoder {
    /// Create a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> StreamResult<Vec<StreamEvent>> {
        self.byte_carry.extend_from_slice(chunk);
        let text = self.drain_utf8();
        self.line_carry.push_str(&text);

        if self.line_carry.len() + self.byte_carry.len() > MAX_BUFFER_SIZE {
            return Err(StreamError::BufferOverflow);
        }

        Ok(self.drain_lines())
    }

    /// Flush the held-back tail once the byte source is exhausted.
    ///
    /// A final record without a trailing newline is still decoded; a
    /// truncated trailing fragment (bytes cut mid-record or mid-code-point)
    /// is expected at end-of-stream and silently dropped.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        self.byte_carry.clear();
        let tail = mem::take(&mut self.line_carry);
        match decode_line(&tail) {
            Decoded::Event(event) => vec![event],
            Decoded::Skip => Vec::new(),
        }
    }

    /// Decode the longest valid UTF-8 prefix of the byte carry.
    ///
    /// An incomplete trailing code point stays in the carry; invalid bytes
    /// in the middle of the stream become U+FFFD so one bad byte cannot
    /// poison everything after it.
    fn drain_utf8(&mut self) -> String {
        let data = mem::take(&mut self.byte_carry);
        let mut out = String::with_capacity(data.len());
        let mut start = 0;

        while start < data.len() {
            match std::str::from_utf8(&data[start..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    start = data.len();
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&data[start..start + valid_up_to]) {
                        out.push_str(valid);
                    }
                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start += valid_up_to + invalid_len;
                        }
                        None => {
                            // Incomplete code point: carry it to the next feed.
                            self.byte_carry = data[start + valid_up_to..].to_vec();
                            return out;
                        }
                    }
                }
            }
        }

        out
    }

    /// Emit every complete line, holding back the unterminated tail.
    fn drain_lines(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(pos) = self.line_carry.find('\n') {
            let rest = self.line_carry.split_off(pos + 1);
            let mut line = mem::replace(&mut self.line_carry, rest);
            line.truncate(pos);
            if let Decoded::Event(event) = decode_line(&line) {
                events.push(event);
            }
        }
        events
    }
}

/// Decode one complete line into a per-record outcome.
///
/// Blank lines, comment lines, and any prefix other than [`RECORD_PREFIX`]
/// are skipped, as are empty payloads (keep-alive heartbeats) and payloads
/// that fail to parse.
#[must_use]
pub fn decode_line(line: &str) -> Decoded {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(payload) = line.strip_prefix(RECORD_PREFIX) else {
        return Decoded::Skip;
    };
    let payload = payload.trim();
    if payload.is_empty() {
        // Keep-alive heartbeat.
        return Decoded::Skip;
    }
    match serde_json::from_str(payload) {
        Ok(event) => Decoded::Event(event),
        Err(err) => {
            tracing::debug!(error = %err, payload, "skipping undecodable record");
            Decoded::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const FIXTURE: &[u8] = b"data: {\"type\":\"status\",\"message\":\"Thinking...\"}\n\
        data: {\"type\":\"token\",\"content\":\"Hello\"}\n\
        data: {\"type\":\"token\",\"content\":\" world\"}\n\
        data: {\"type\":\"done\",\"conversationId\":\"c1\"}\n";

    fn decode_all(chunks: &[&[u8]]) -> Vec<StreamEvent> {
        let mut decoder = FrameDecoder::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.feed(chunk).unwrap());
        }
        events.extend(decoder.finish());
        events
    }

    fn fixture_events() -> Vec<StreamEvent> {
        vec![
            StreamEvent::Status {
                message: "Thinking...".into(),
            },
            StreamEvent::Token {
                content: "Hello".into(),
            },
            StreamEvent::Token {
                content: " world".into(),
            },
            StreamEvent::Done {
                conversation_id: Some("c1".into()),
            },
        ]
    }

    #[test]
    fn test_single_chunk() {
        assert_eq!(decode_all(&[FIXTURE]), fixture_events());
    }

    #[test]
    fn test_chunking_invariance_every_split() {
        let expected = fixture_events();
        for split in 1..FIXTURE.len() {
            let (a, b) = FIXTURE.split_at(split);
            assert_eq!(decode_all(&[a, b]), expected, "split at byte {split}");
        }
    }

    #[test]
    fn test_byte_at_a_time() {
        let chunks: Vec<&[u8]> = FIXTURE.chunks(1).collect();
        assert_eq!(decode_all(&chunks), fixture_events());
    }

    #[rstest]
    #[case::inside_prefix(2)]
    #[case::at_prefix_end(5)]
    #[case::inside_payload(20)]
    #[case::at_line_boundary(48)]
    fn test_named_split_points(#[case] split: usize) {
        let (a, b) = FIXTURE.split_at(split);
        assert_eq!(decode_all(&[a, b]), fixture_events());
    }

    #[test]
    fn test_multibyte_character_split() {
        let record = "data: {\"type\":\"token\",\"content\":\"héllo ☃\"}\n".as_bytes();
        let expected = vec![StreamEvent::Token {
            content: "héllo ☃".into(),
        }];
        for split in 1..record.len() {
            let (a, b) = record.split_at(split);
            assert_eq!(decode_all(&[a, b]), expected, "split at byte {split}");
        }
    }

    #[test]
    fn test_heartbeat_and_blank_lines_ignored() {
        let stream = b"data: \n\ndata:\n: comment\ndata: {\"type\":\"done\"}\n";
        assert_eq!(
            decode_all(&[stream]),
            vec![StreamEvent::Done {
                conversation_id: None
            }]
        );
    }

    #[test]
    fn test_other_prefixes_ignored() {
        let stream = b"event: message\nid: 7\ndata: {\"type\":\"token\",\"content\":\"x\"}\n";
        assert_eq!(
            decode_all(&[stream]),
            vec![StreamEvent::Token { content: "x".into() }]
        );
    }

    #[test]
    fn test_malformed_record_skipped_stream_continues() {
        let stream = b"data: {not json}\ndata: {\"type\":\"token\",\"content\":\"ok\"}\n";
        assert_eq!(
            decode_all(&[stream]),
            vec![StreamEvent::Token {
                content: "ok".into()
            }]
        );
    }

    #[test]
    fn test_unknown_event_type_skipped() {
        let stream = b"data: {\"type\":\"usage\",\"tokens\":9}\ndata: {\"type\":\"done\"}\n";
        assert_eq!(
            decode_all(&[stream]),
            vec![StreamEvent::Done {
                conversation_id: None
            }]
        );
    }

    #[test]
    fn test_finish_decodes_unterminated_final_record() {
        // No trailing newline after the last record.
        let stream = b"data: {\"type\":\"done\",\"conversationId\":\"c9\"}";
        assert_eq!(
            decode_all(&[stream]),
            vec![StreamEvent::Done {
                conversation_id: Some("c9".into())
            }]
        );
    }

    #[test]
    fn test_finish_drops_truncated_record() {
        let stream = b"data: {\"type\":\"token\",\"content\":\"ok\"}\ndata: {\"type\":\"to";
        assert_eq!(
            decode_all(&[stream]),
            vec![StreamEvent::Token {
                content: "ok".into()
            }]
        );
    }

    #[test]
    fn test_finish_drops_incomplete_code_point() {
        let mut bytes = b"data: {\"type\":\"token\",\"content\":\"ok\"}\n".to_vec();
        bytes.extend_from_slice(&[0xE2, 0x98]); // first two bytes of ☃
        assert_eq!(
            decode_all(&[bytes.as_slice()]),
            vec![StreamEvent::Token {
                content: "ok".into()
            }]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let stream = b"data: {\"type\":\"token\",\"content\":\"ok\"}\r\ndata: {\"type\":\"done\"}\r\n";
        assert_eq!(
            decode_all(&[stream]),
            vec![
                StreamEvent::Token {
                    content: "ok".into()
                },
                StreamEvent::Done {
                    conversation_id: None
                },
            ]
        );
    }

    #[test]
    fn test_invalid_bytes_replaced_not_fatal() {
        let mut bytes = b"data: {\"type\":\"token\",\"content\":\"a".to_vec();
        bytes.push(0xFF); // not valid UTF-8 anywhere
        bytes.extend_from_slice(b"b\"}\ndata: {\"type\":\"done\"}\n");
        let events = decode_all(&[bytes.as_slice()]);
        assert_eq!(
            events,
            vec![
                StreamEvent::Token {
                    content: "a\u{FFFD}b".into()
                },
                StreamEvent::Done {
                    conversation_id: None
                },
            ]
        );
    }

    #[test]
    fn test_buffer_overflow_guard() {
        let mut decoder = FrameDecoder::new();
        let chunk = vec![b'a'; 1024 * 1024];
        let mut overflowed = false;
        for _ in 0..11 {
            if decoder.feed(&chunk).is_err() {
                overflowed = true;
                break;
            }
        }
        assert!(overflowed);
    }

    #[test]
    fn test_decode_line_outcomes() {
        assert_eq!(decode_line(""), Decoded::Skip);
        assert_eq!(decode_line("retry: 500"), Decoded::Skip);
        assert_eq!(decode_line("data:   "), Decoded::Skip);
        assert_eq!(
            decode_line("data: {\"type\":\"status\",\"message\":\"hi\"}"),
            Decoded::Event(StreamEvent::Status {
                message: "hi".into()
            })
        );
        // Prefix without the space is still a candidate record.
        assert_eq!(
            decode_line("data:{\"type\":\"done\"}"),
            Decoded::Event(StreamEvent::Done {
                conversation_id: None
            })
        );
    }
}
