//! Packet decoder: turns a streamed response body into packet records.
//!
//! The send-message body is a sequence of newline-delimited records, one
//! JSON object per line. [`PacketDecoder`] buffers raw bytes (so UTF-8
//! sequences split across chunks survive), yields complete records, and
//! [`classify_record`] maps each record to a [`Packet`].
//!
//! Event-stream style framing is tolerated: a `data:` prefix is stripped,
//! `event:` lines and `:` comments are ignored.

use casematch_domain::Packet;
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

/// Malformed framing in a streamed body
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("record is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed record: {error} (raw: {raw})")]
    Malformed { error: String, raw: String },

    #[error("stream ended before the termination record")]
    UnexpectedEnd,
}

/// Classification of a decoded record.
#[derive(Debug, PartialEq)]
pub enum Record {
    /// One of the three packet shapes.
    Packet(Packet),
    /// `{ "error": "..." }` reported by the backend mid-stream.
    Error(String),
    /// Any other record (message ids, bookkeeping); skipped by consumers.
    Other(Value),
}

/// Classify a record by inspecting its keys.
pub fn classify_record(value: Value) -> Record {
    let Value::Object(mut map) = value else {
        return Record::Other(value);
    };

    if let Some(Value::String(piece)) = map.get("answer_piece") {
        return Record::Packet(Packet::AnswerFragment(piece.clone()));
    }
    if let Some(info) = map.remove("document_info") {
        return Record::Packet(Packet::SourceReference(info));
    }
    if let Some(info) = map.remove("stream_stop_info") {
        return Record::Packet(Packet::StreamTermination(info));
    }
    if let Some(Value::String(message)) = map.get("error") {
        return Record::Error(message.clone());
    }
    Record::Other(Value::Object(map))
}

/// Incremental line-framed JSON decoder.
///
/// Feed body chunks with [`feed`](Self::feed), pull complete records with
/// [`next_record`](Self::next_record). Call [`finish`](Self::finish) at end of
/// body so a final unterminated line is still decoded.
#[derive(Debug, Default)]
pub struct PacketDecoder {
    buffer: Vec<u8>,
}

impl PacketDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Mark the end of input.
    pub fn finish(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with(b"\n") {
            self.buffer.push(b'\n');
        }
    }

    /// Bytes received but not yet part of a complete line.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Next complete record, or `None` if more bytes are needed.
    pub fn next_record(&mut self) -> Option<Result<Value, DecodeError>> {
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let text = match std::str::from_utf8(&line) {
                Ok(text) => text.trim(),
                Err(e) => return Some(Err(DecodeError::InvalidUtf8(e))),
            };

            let Some(payload) = record_payload(text) else {
                continue;
            };
            trace!("Decoder: record ({} bytes)", payload.len());

            return Some(
                serde_json::from_str(payload).map_err(|e| DecodeError::Malformed {
                    error: e.to_string(),
                    raw: payload.to_string(),
                }),
            );
        }
        None
    }
}

/// The JSON part of a line, or `None` for blank lines and framing noise.
fn record_payload(line: &str) -> Option<&str> {
    if line.is_empty() || line.starts_with(':') || line.starts_with("event:") {
        return None;
    }
    let payload = line.strip_prefix("data:").map(str::trim).unwrap_or(line);
    if payload.is_empty() {
        None
    } else {
        Some(payload)
    }
}
