//! Chat backend port
//!
//! Defines the interface for talking to the conversational backend:
//! session management and streamed message exchanges.

use async_trait::async_trait;
use casematch_domain::{Answer, ModelSpec, Packet, ProfileId, SessionId};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during chat backend operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend rejected session creation, or returned no usable id.
    #[error("Failed to create chat session: {reason}")]
    SessionCreation { status: Option<u16>, reason: String },

    #[error("Failed to update chat session model - {status}")]
    SessionConfig { status: u16 },

    /// The send-message handshake was rejected before any packet was produced.
    #[error("Message exchange rejected with status {status}")]
    Exchange { status: u16 },

    #[error("Operation aborted")]
    Aborted,

    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend reported an error record in the middle of a stream.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl GatewayError {
    /// Check if this error represents an intentional cancellation
    pub fn is_aborted(&self) -> bool {
        matches!(self, GatewayError::Aborted)
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::SessionCreation { status, .. } => *status,
            GatewayError::SessionConfig { status } | GatewayError::Exchange { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Lazy, single-pass sequence of packets from one exchange.
///
/// Each packet is produced only when the stream is polled. Once the stream
/// yields an error or the terminal packet it is exhausted and never resumes.
pub struct PacketStream {
    inner: BoxStream<'static, Result<Packet, GatewayError>>,
}

impl PacketStream {
    pub fn new(stream: impl Stream<Item = Result<Packet, GatewayError>> + Send + 'static) -> Self {
        Self {
            inner: stream.boxed(),
        }
    }

    /// A stream that replays already-decoded packets (tests, fixtures).
    pub fn from_packets(packets: Vec<Packet>) -> Self {
        Self::new(stream::iter(packets.into_iter().map(Ok)))
    }

    /// Drain the stream into an [`Answer`].
    pub async fn collect_answer(self) -> Result<Answer, GatewayError> {
        self.collect_answer_with(|_| {}).await
    }

    /// Drain the stream into an [`Answer`], calling `on_packet` for each packet
    /// before it is folded in.
    ///
    /// Stops at the terminal packet. The first error is returned as-is; the
    /// partial answer is discarded.
    pub async fn collect_answer_with(
        mut self,
        mut on_packet: impl FnMut(&Packet),
    ) -> Result<Answer, GatewayError> {
        let mut answer = Answer::new();
        while let Some(item) = self.inner.next().await {
            let packet = item?;
            on_packet(&packet);
            let terminal = packet.is_terminal();
            answer.push(packet);
            if terminal {
                break;
            }
        }
        Ok(answer)
    }
}

impl Stream for PacketStream {
    type Item = Result<Packet, GatewayError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for PacketStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketStream").finish_non_exhaustive()
    }
}

/// Gateway to the conversational backend
///
/// This port defines how the application layer opens sessions and exchanges
/// messages. Implementations (adapters) live in the infrastructure layer.
///
/// Every call honours `cancel`: an already-cancelled token fails with
/// [`GatewayError::Aborted`] without issuing a request.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Create a new session bound to `profile`
    async fn create_session(
        &self,
        profile: ProfileId,
        description: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<SessionId, GatewayError>;

    /// Override the model of an existing session
    ///
    /// Must be called before the first message is sent into the session.
    async fn override_model(
        &self,
        session: &SessionId,
        model: &ModelSpec,
        cancel: &CancellationToken,
    ) -> Result<(), GatewayError>;

    /// Send a message and return the streamed response
    ///
    /// Fails before any packet is produced if the handshake is rejected.
    /// Cancelling `cancel` afterwards ends the stream with
    /// [`GatewayError::Aborted`].
    async fn send_message(
        &self,
        session: &SessionId,
        message: &str,
        profile: ProfileId,
        cancel: CancellationToken,
    ) -> Result<PacketStream, GatewayError>;
}
