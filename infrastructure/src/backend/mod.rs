//! HTTP adapter for the conversational backend
//!
//! Implements the `ChatBackend` port over the backend's chat API:
//! session creation, model override, and the streamed send-message exchange.

pub mod client;
pub mod decoder;
pub mod error;
pub mod protocol;
pub mod stream;

#[cfg(test)]
mod test_server;

pub use client::HttpChatBackend;
pub use decoder::{DecodeError, PacketDecoder, Record, classify_record};
pub use error::BackendError;
pub use stream::packet_stream;
