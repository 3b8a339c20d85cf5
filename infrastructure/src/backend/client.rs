//! HTTP chat backend implementation

use super::error::{BackendError, Result};
use super::protocol::{
    CREATE_SESSION_PATH, CreateSessionRequest, SEND_MESSAGE_PATH, SendMessageRequest,
    UPDATE_MODEL_PATH, UpdateModelRequest, parse_session_id,
};
use super::stream::packet_stream;
use async_trait::async_trait;
use casematch_application::{ChatBackend, GatewayError, PacketStream};
use casematch_domain::{ModelSpec, ProfileId, SessionId};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Chat backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Create a backend client for `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a backend client whose connection attempts time out
    pub fn with_connect_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().connect_timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a backend client with an existing HTTP client
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(BackendError::InvalidBaseUrl(base_url));
        }

        info!("HttpChatBackend initialized for {}", trimmed);
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Run a request unless `cancel` has fired, dropping it if `cancel` fires first.
///
/// `request` is only invoked once the token has been checked, so a cancelled
/// token never issues a request.
async fn cancellable<T, F, Fut>(cancel: &CancellationToken, request: F) -> std::result::Result<T, GatewayError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = reqwest::Result<T>>,
{
    if cancel.is_cancelled() {
        return Err(GatewayError::Aborted);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GatewayError::Aborted),
        result = request() => result.map_err(|e| BackendError::from(e).into()),
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn create_session(
        &self,
        profile: ProfileId,
        description: Option<&str>,
        cancel: &CancellationToken,
    ) -> std::result::Result<SessionId, GatewayError> {
        let url = self.endpoint(CREATE_SESSION_PATH);
        let request = CreateSessionRequest::new(profile, description);
        debug!("Creating chat session for profile {}", profile);

        let response = cancellable(cancel, || self.client.post(&url).json(&request).send()).await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Session creation rejected: {}", status);
            return Err(GatewayError::SessionCreation {
                status: Some(status.as_u16()),
                reason: format!("backend responded with {}", status),
            });
        }

        let bytes = cancellable(cancel, || response.bytes()).await?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| GatewayError::SessionCreation {
                status: None,
                reason: format!("malformed response body: {}", e),
            })?;

        parse_session_id(&body).map_err(|reason| GatewayError::SessionCreation {
            status: None,
            reason,
        })
    }

    async fn override_model(
        &self,
        session: &SessionId,
        model: &ModelSpec,
        cancel: &CancellationToken,
    ) -> std::result::Result<(), GatewayError> {
        let url = self.endpoint(UPDATE_MODEL_PATH);
        let request = UpdateModelRequest::new(session, model);
        debug!("Overriding model of session {} with {}", session, model);

        let response = cancellable(cancel, || self.client.put(&url).json(&request).send()).await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Model override rejected for session {}: {}", session, status);
            return Err(GatewayError::SessionConfig {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn send_message(
        &self,
        session: &SessionId,
        message: &str,
        profile: ProfileId,
        cancel: CancellationToken,
    ) -> std::result::Result<PacketStream, GatewayError> {
        let url = self.endpoint(SEND_MESSAGE_PATH);
        let request = SendMessageRequest::new(session, message, profile);
        debug!("Sending message to session {} ({} chars)", session, message.len());

        let response = cancellable(&cancel, || self.client.post(&url).json(&request).send()).await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Message exchange rejected for session {}: {}", session, status);
            return Err(GatewayError::Exchange {
                status: status.as_u16(),
            });
        }

        Ok(packet_stream(response.bytes_stream(), cancel))
    }
}
