//! In-process stand-in for the HealthLinc handler services

use anyhow::Context as _;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use nphies_gateway::routing::HandlerName;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub handler: String,
    pub task: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

/// How the stub answers each handler
#[derive(Debug, Clone, Default)]
pub struct StubBehaviour {
    /// Answer 500
    pub failing: Vec<HandlerName>,
    /// Sleep before answering
    pub delayed: Vec<(HandlerName, Duration)>,
}

impl StubBehaviour {
    pub fn failing(handlers: &[HandlerName]) -> Self {
        Self {
            failing: handlers.to_vec(),
            ..Self::default()
        }
    }

    pub fn delayed(handler: HandlerName, delay: Duration) -> Self {
        Self {
            delayed: vec![(handler, delay)],
            ..Self::default()
        }
    }
}

#[derive(Clone, Default)]
struct StubState {
    failing: Arc<HashSet<String>>,
    delays: Arc<HashMap<String, Duration>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Each handler is served at `/{handler}`.
pub struct StubHandlers {
    pub base_url: String,
    state: StubState,
}

impl StubHandlers {
    pub async fn spawn(behaviour: &StubBehaviour) -> anyhow::Result<Self> {
        let state = StubState {
            failing: Arc::new(behaviour.failing.iter().map(|h| h.to_string()).collect()),
            delays: Arc::new(
                behaviour
                    .delayed
                    .iter()
                    .map(|(h, delay)| (h.to_string(), *delay))
                    .collect(),
            ),
            calls: Arc::default(),
        };

        let app = Router::new()
            .route("/:handler", post(receive))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind stub handler listener")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            state,
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state
            .calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn calls_to(&self, handler: HandlerName) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.handler == handler.as_str())
            .collect()
    }

    /// Polls until at least `count` calls have arrived.
    pub async fn wait_for_calls(&self, count: usize) -> anyhow::Result<Vec<RecordedCall>> {
        for _ in 0..100 {
            let calls = self.calls();
            if calls.len() >= count {
                return Ok(calls);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        anyhow::bail!(
            "expected {count} handler calls, got {}",
            self.calls().len()
        )
    }
}

async fn receive(
    State(state): State<StubState>,
    Path(handler): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    let call = RecordedCall {
        handler: handler.clone(),
        task: header("x-mcp-task"),
        request_id: header("x-request-id"),
        body,
    };
    if let Ok(mut calls) = state.calls.lock() {
        calls.push(call);
    }

    if let Some(delay) = state.delays.get(&handler) {
        tokio::time::sleep(*delay).await;
    }

    if state.failing.contains(&handler) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "handler unavailable"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({"status": "accepted", "handler": handler})),
    )
}
