//! Answer assembled from a packet sequence

use super::packet::Packet;
use serde_json::Value;

/// Accumulated result of one exchange.
///
/// Fragments are concatenated in the order they are pushed, so pushing every
/// packet of a stream in delivery order reconstructs the answer exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answer {
    text: String,
    fragments: usize,
    sources: Vec<Value>,
    termination: Option<Value>,
}

impl Answer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one packet into the answer.
    pub fn push(&mut self, packet: Packet) {
        match packet {
            Packet::AnswerFragment(piece) => {
                self.text.push_str(&piece);
                self.fragments += 1;
            }
            Packet::SourceReference(info) => self.sources.push(info),
            Packet::StreamTermination(info) => self.termination = Some(info),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of answer fragments folded in.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn sources(&self) -> &[Value] {
        &self.sources
    }

    /// Completion status, if the termination packet was observed.
    pub fn termination(&self) -> Option<&Value> {
        self.termination.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.termination.is_some()
    }
}

impl FromIterator<Packet> for Answer {
    fn from_iter<I: IntoIterator<Item = Packet>>(iter: I) -> Self {
        let mut answer = Answer::new();
        for packet in iter {
            answer.push(packet);
        }
        answer
    }
}
