//! Packets decoded from a streamed exchange.
//!
//! A send-message response is an unbounded sequence of [`Packet`]s:
//! zero or more [`AnswerFragment`](Packet::AnswerFragment)s and
//! [`SourceReference`](Packet::SourceReference)s in any interleaving,
//! closed by exactly one [`StreamTermination`](Packet::StreamTermination).

use serde_json::Value;

/// One decoded unit of a streamed exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// An incremental slice of generated answer text (wire: `answer_piece`).
    AnswerFragment(String),
    /// Metadata about a supporting document (wire: `document_info`).
    ///
    /// Passed through undecoded.
    SourceReference(Value),
    /// Terminal marker carrying completion status (wire: `stream_stop_info`).
    StreamTermination(Value),
}

impl Packet {
    /// Returns the text slice if this is an answer fragment.
    pub fn answer_piece(&self) -> Option<&str> {
        match self {
            Packet::AnswerFragment(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this packet closes the exchange.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Packet::StreamTermination(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Packet::AnswerFragment(_) => "answer_piece",
            Packet::SourceReference(_) => "document_info",
            Packet::StreamTermination(_) => "stream_stop_info",
        }
    }
}
