//! Scriptable in-process backend for adapter tests

use super::protocol::{CREATE_SESSION_PATH, SEND_MESSAGE_PATH, UPDATE_MODEL_PATH};
use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub type ChunkSender = mpsc::Sender<Result<String, std::io::Error>>;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

/// Scripted reply for one request.
pub enum Reply {
    Json(StatusCode, Value),
    Status(StatusCode),
    /// Complete NDJSON body, one record per line.
    Lines(Vec<Value>),
    /// Body fed chunk by chunk from the test.
    Live(mpsc::Receiver<Result<String, std::io::Error>>),
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn live() -> (ChunkSender, Reply) {
        let (tx, rx) = mpsc::channel(16);
        (tx, Reply::Live(rx))
    }

    pub fn answer(text: &str) -> Reply {
        Reply::Lines(vec![
            json!({"user_message_id": 1, "reserved_assistant_message_id": 2}),
            json!({"answer_piece": text}),
            json!({"stream_stop_info": {"stop_reason": "finished"}}),
        ])
    }
}

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    sessions: Arc<Mutex<u32>>,
}

pub struct TestServer {
    base_url: String,
    state: ServerState,
}

impl TestServer {
    pub async fn start() -> Self {
        let state = ServerState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Queue a reply for the next request to `path`.
    pub fn reply(&self, path: &str, reply: Reply) {
        self.state
            .replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn handle(State(state): State<ServerState>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: path.clone(),
        body,
    });

    let scripted = state
        .replies
        .lock()
        .unwrap()
        .get_mut(&path)
        .and_then(VecDeque::pop_front);

    let reply = match scripted {
        Some(reply) => reply,
        None => default_reply(&state, &path),
    };
    render(reply).await
}

fn default_reply(state: &ServerState, path: &str) -> Reply {
    match path {
        CREATE_SESSION_PATH => {
            let mut sessions = state.sessions.lock().unwrap();
            *sessions += 1;
            Reply::Json(
                StatusCode::OK,
                json!({"chat_session_id": format!("session-{}", *sessions)}),
            )
        }
        UPDATE_MODEL_PATH => Reply::Json(StatusCode::OK, json!({})),
        SEND_MESSAGE_PATH => Reply::answer("ok"),
        _ => Reply::Status(StatusCode::NOT_FOUND),
    }
}

async fn render(reply: Reply) -> Response {
    let mut reply = reply;
    while let Reply::Delayed(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }

    match reply {
        Reply::Json(status, value) => (status, axum::Json(value)).into_response(),
        Reply::Status(status) => status.into_response(),
        Reply::Lines(lines) => {
            let body: String = lines.iter().map(|line| format!("{}\n", line)).collect();
            (StatusCode::OK, body).into_response()
        }
        Reply::Live(rx) => Response::new(Body::from_stream(ReceiverStream::new(rx))),
        Reply::Delayed(..) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
