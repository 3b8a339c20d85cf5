//! JSON wire types for the chat backend HTTP API.
//!
//! # Endpoints
//!
//! - `POST /api/chat/create-chat-session`: [`CreateSessionRequest`] → `{chat_session_id}`
//! - `PUT /api/chat/update-chat-session-model`: [`UpdateModelRequest`] → opaque
//! - `POST /api/chat/send-message`: [`SendMessageRequest`] → newline-delimited packet records
//!
//! Everything in a send-message body other than the session, message and
//! profile is fixed policy, held in [`SEND_MESSAGE_DEFAULTS`].

use casematch_domain::{ModelSpec, ProfileId, SessionId};
use serde::Serialize;
use serde_json::Value;

pub const CREATE_SESSION_PATH: &str = "/api/chat/create-chat-session";
pub const UPDATE_MODEL_PATH: &str = "/api/chat/update-chat-session-model";
pub const SEND_MESSAGE_PATH: &str = "/api/chat/send-message";

/// Session creation body
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub persona_id: i64,
    pub description: Option<&'a str>,
}

impl<'a> CreateSessionRequest<'a> {
    pub fn new(profile: ProfileId, description: Option<&'a str>) -> Self {
        Self {
            persona_id: profile.value(),
            description,
        }
    }
}

/// Extract the session id from a session creation response body.
pub fn parse_session_id(body: &Value) -> Result<SessionId, String> {
    let raw = body
        .get("chat_session_id")
        .ok_or_else(|| "response has no chat_session_id".to_string())?;
    let id = raw
        .as_str()
        .ok_or_else(|| format!("chat_session_id is not a string: {}", raw))?;
    SessionId::new(id).map_err(|e| e.to_string())
}

/// Model override body
#[derive(Debug, Clone, Serialize)]
pub struct UpdateModelRequest<'a> {
    pub chat_session_id: &'a str,
    pub new_alternate_model: String,
}

impl<'a> UpdateModelRequest<'a> {
    pub fn new(session: &'a SessionId, model: &ModelSpec) -> Self {
        Self {
            chat_session_id: session.as_str(),
            new_alternate_model: model.alternate_model(),
        }
    }
}

/// Document filters applied to retrieval (all unset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrievalFilters {
    pub source_type: Option<&'static str>,
    pub document_set: Option<&'static str>,
    pub time_cutoff: Option<&'static str>,
    pub tags: &'static [&'static str],
    pub user_file_ids: &'static [i64],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrievalOptions {
    pub run_search: &'static str,
    pub real_time: bool,
    pub filters: RetrievalFilters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LlmOverride {
    pub model_provider: &'static str,
    pub model_version: &'static str,
}

/// Fixed part of every send-message body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendMessageDefaults {
    pub parent_message_id: Option<i64>,
    pub prompt_id: Option<i64>,
    pub search_doc_ids: Option<&'static [i64]>,
    pub file_descriptors: &'static [&'static str],
    pub user_file_ids: &'static [i64],
    pub user_folder_ids: &'static [i64],
    pub regenerate: bool,
    pub retrieval_options: RetrievalOptions,
    pub prompt_override: Option<&'static str>,
    pub llm_override: LlmOverride,
    pub use_agentic_search: bool,
}

/// Retrieval runs automatically in real-time mode with no filters, no prompt
/// override and non-agentic search.
pub const SEND_MESSAGE_DEFAULTS: SendMessageDefaults = SendMessageDefaults {
    parent_message_id: None,
    prompt_id: None,
    search_doc_ids: None,
    file_descriptors: &[],
    user_file_ids: &[],
    user_folder_ids: &[],
    regenerate: false,
    retrieval_options: RetrievalOptions {
        run_search: "auto",
        real_time: true,
        filters: RetrievalFilters {
            source_type: None,
            document_set: None,
            time_cutoff: None,
            tags: &[],
            user_file_ids: &[],
        },
    },
    prompt_override: None,
    llm_override: LlmOverride {
        model_provider: "Default",
        model_version: "gpt-4o",
    },
    use_agentic_search: false,
};

/// Send-message body
///
/// Field order matches the backend's own client so the serialized body is
/// identical byte for byte.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub alternate_assistant_id: i64,
    pub chat_session_id: &'a str,
    pub parent_message_id: Option<i64>,
    pub message: &'a str,
    pub prompt_id: Option<i64>,
    pub search_doc_ids: Option<&'static [i64]>,
    pub file_descriptors: &'static [&'static str],
    pub user_file_ids: &'static [i64],
    pub user_folder_ids: &'static [i64],
    pub regenerate: bool,
    pub retrieval_options: RetrievalOptions,
    pub prompt_override: Option<&'static str>,
    pub llm_override: LlmOverride,
    pub use_agentic_search: bool,
}

impl<'a> SendMessageRequest<'a> {
    pub fn new(session: &'a SessionId, message: &'a str, profile: ProfileId) -> Self {
        let defaults = SEND_MESSAGE_DEFAULTS;
        Self {
            alternate_assistant_id: profile.value(),
            chat_session_id: session.as_str(),
            parent_message_id: defaults.parent_message_id,
            message,
            prompt_id: defaults.prompt_id,
            search_doc_ids: defaults.search_doc_ids,
            file_descriptors: defaults.file_descriptors,
            user_file_ids: defaults.user_file_ids,
            user_folder_ids: defaults.user_folder_ids,
            regenerate: defaults.regenerate,
            retrieval_options: defaults.retrieval_options,
            prompt_override: defaults.prompt_override,
            llm_override: defaults.llm_override,
            use_agentic_search: defaults.use_agentic_search,
        }
    }
}
