//! Cancellation-aware packet stream over an HTTP response body

use super::decoder::{DecodeError, PacketDecoder, Record, classify_record};
use super::error::BackendError;
use casematch_application::{GatewayError, PacketStream};
use casematch_domain::Packet;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

type Body = BoxStream<'static, Result<Vec<u8>, String>>;

/// Wrap a streamed body into a lazy [`PacketStream`].
///
/// Bytes are read only while the stream is polled. The stream ends after the
/// termination packet, the first error, or cancellation via `cancel`; it is
/// never resumed afterwards.
pub fn packet_stream<S, B, E>(body: S, cancel: CancellationToken) -> PacketStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let body = body
        .map(|chunk| {
            chunk
                .map(|bytes| bytes.as_ref().to_vec())
                .map_err(|e| e.to_string())
        })
        .boxed();

    let reader = BodyReader {
        body,
        decoder: PacketDecoder::new(),
        ended: false,
        cancel,
    };

    let packets = stream::unfold(Some(reader), |state| async move {
        let mut reader = state?;
        match reader.next_packet().await {
            Ok(packet) => {
                let next = if packet.is_terminal() {
                    None
                } else {
                    Some(reader)
                };
                Some((Ok(packet), next))
            }
            Err(e) => Some((Err(e), None)),
        }
    })
    .fuse();

    PacketStream::new(packets)
}

struct BodyReader {
    body: Body,
    decoder: PacketDecoder,
    ended: bool,
    cancel: CancellationToken,
}

impl BodyReader {
    async fn next_packet(&mut self) -> Result<Packet, GatewayError> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(GatewayError::Aborted);
            }

            while let Some(record) = self.decoder.next_record() {
                let value = record.map_err(decode_error)?;
                match classify_record(value) {
                    Record::Packet(packet) => {
                        trace!("Stream: {} packet", packet.kind());
                        return Ok(packet);
                    }
                    Record::Error(message) => return Err(GatewayError::Backend(message)),
                    Record::Other(value) => debug!("Skipping unrecognized record: {}", value),
                }
            }

            if self.ended {
                warn!("Body ended before the termination record");
                return Err(decode_error(DecodeError::UnexpectedEnd));
            }

            let chunk = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(GatewayError::Aborted),
                chunk = self.body.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => self.decoder.feed(&bytes),
                Some(Err(e)) => return Err(GatewayError::Connection(e)),
                None => {
                    self.ended = true;
                    self.decoder.finish();
                }
            }
        }
    }
}

fn decode_error(error: DecodeError) -> GatewayError {
    BackendError::from(error).into()
}
