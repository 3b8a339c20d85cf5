//! Transcript port for two-stage runs
//!
//! Every step of a stage (opening its session, overriding the triage model,
//! sending the query, and how the packet stream ended) is handed to an
//! [`ExchangeLogger`] as one [`ExchangeEvent`]. The use case never inspects
//! what the logger does with it.

use serde_json::Value;

/// One step of a stage, as recorded in a run transcript.
pub struct ExchangeEvent {
    /// `session_created`, `model_override`, `message_sent`,
    /// `exchange_complete`, `exchange_aborted` or `exchange_failed`.
    pub event_type: &'static str,
    /// Stage name, session id and step-specific fields (profile, model,
    /// fragment count, error text).
    pub payload: Value,
}

impl ExchangeEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for run transcript events.
///
/// Called inline from the stage pipeline, including from inside a draining
/// packet stream, so `log` must not block on I/O for long and cannot fail the run.
pub trait ExchangeLogger: Send + Sync {
    fn log(&self, event: ExchangeEvent);
}

/// Discards every event; the default when no transcript is configured.
pub struct NoExchangeLogger;

impl ExchangeLogger for NoExchangeLogger {
    fn log(&self, _event: ExchangeEvent) {}
}
