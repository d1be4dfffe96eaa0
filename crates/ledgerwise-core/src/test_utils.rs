//! Test utilities for ledgerwise-core
//!
//! Provides a mock text-generation server speaking both the Gemini
//! `generateContent` and the OpenAI chat completions wire formats, so backends
//! can be exercised over real HTTP.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

struct ServerState {
    /// Text placed in every completion; `None` means respond with `failure_status`
    reply: Option<String>,
    failure_status: u16,
    requests: AtomicUsize,
    last_api_key: Mutex<Option<String>>,
}

/// Mock provider server for tests
pub struct MockProviderServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    state: Arc<ServerState>,
}

impl MockProviderServer {
    /// Start a server that answers every completion with `reply`
    pub async fn start(reply: &str) -> Self {
        Self::spawn(ServerState {
            reply: Some(reply.to_string()),
            failure_status: 500,
            requests: AtomicUsize::new(0),
            last_api_key: Mutex::new(None),
        })
        .await
    }

    /// Start a server that answers every request with HTTP `status`
    pub async fn start_failing(status: u16) -> Self {
        Self::spawn(ServerState {
            reply: None,
            failure_status: status,
            requests: AtomicUsize::new(0),
            last_api_key: Mutex::new(None),
        })
        .await
    }

    async fn spawn(state: ServerState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route(
                "/v1beta/models/:model",
                get(handle_model_info).post(handle_generate_content),
            )
            .route("/v1/chat/completions", post(handle_chat_completion))
            .route("/v1/models", get(handle_list_models))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            state,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of completion requests received
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// API key seen on the most recent request, health checks included
    pub fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockProviderServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn record_request(state: &ServerState, headers: &HeaderMap) {
    state.requests.fetch_add(1, Ordering::SeqCst);
    record_api_key(state, headers);
}

/// Remember the key from `x-goog-api-key` or a bearer `Authorization` header
fn record_api_key(state: &ServerState, headers: &HeaderMap) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
        });
    *state.last_api_key.lock().unwrap() = key;
}

fn failure(state: &ServerState) -> Response {
    let status =
        StatusCode::from_u16(state.failure_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, "mock provider failure").into_response()
}

/// Gemini model metadata (health check)
async fn handle_model_info(
    State(state): State<Arc<ServerState>>,
    Path(model): Path<String>,
) -> Response {
    if state.reply.is_none() {
        return failure(&state);
    }
    Json(json!({ "name": format!("models/{}", model) })).into_response()
}

/// Gemini generateContent endpoint
async fn handle_generate_content(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(_request): Json<Value>,
) -> Response {
    record_request(&state, &headers);
    match state.reply {
        Some(ref text) => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        None => failure(&state),
    }
}

/// OpenAI chat completions endpoint
async fn handle_chat_completion(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(_request): Json<Value>,
) -> Response {
    record_request(&state, &headers);
    match state.reply {
        Some(ref text) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        None => failure(&state),
    }
}

/// OpenAI model list (health check)
async fn handle_list_models(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    record_api_key(&state, &headers);
    if state.reply.is_none() {
        return failure(&state);
    }
    Json(json!({ "object": "list", "data": [{ "id": "mock-model" }] })).into_response()
}
