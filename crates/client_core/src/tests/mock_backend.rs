use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub script: String,
    pub authorization: Option<String>,
    pub body: Value,
}

impl RecordedCall {
    pub fn action(&self) -> &str {
        self.body
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Raw(&'static str),
}

#[derive(Clone, Default)]
struct MockState {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Stand-in for the PHP backend: records every call and answers from a
/// per-action script. Unscripted actions get a 404 envelope.
pub struct MockBackend {
    pub base_url: String,
    state: MockState,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let state = MockState::default();
        let app = Router::new()
            .route("/apis/root/:script", post(handle_action))
            .with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            base_url: format!("http://{addr}/apis/root"),
            state,
        }
    }

    pub async fn reply(&self, action: &str, envelope: Value) {
        self.state
            .replies
            .lock()
            .await
            .insert(action.to_string(), Reply::Json(envelope));
    }

    pub async fn reply_raw(&self, action: &str, body: &'static str) {
        self.state
            .replies
            .lock()
            .await
            .insert(action.to_string(), Reply::Raw(body));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().await.clone()
    }

    pub async fn last_call(&self, action: &str) -> Option<RecordedCall> {
        self.calls()
            .await
            .into_iter()
            .rev()
            .find(|call| call.action() == action)
    }
}

async fn handle_action(
    State(state): State<MockState>,
    Path(script): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let call = RecordedCall {
        script,
        authorization,
        body,
    };
    let action = call.action().to_string();
    state.calls.lock().await.push(call);

    let reply = state.replies.lock().await.get(&action).cloned();
    match reply {
        Some(Reply::Json(envelope)) => Json(envelope).into_response(),
        Some(Reply::Raw(text)) => (StatusCode::INTERNAL_SERVER_ERROR, text).into_response(),
        None => Json(json!({"code": 404, "message": "unknown action"})).into_response(),
    }
}
