//! Outbound handler client
//!
//! Each handler exposes one HTTP endpoint accepting `{task, payload}`. A 2xx
//! JSON reply is success; anything else becomes a [`HandlerError`].

use crate::config::Config;
use crate::routing::HandlerName;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const TASK_HEADER: &str = "X-MCP-Task";
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Why a handler call did not succeed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    #[error("Handler unavailable: {0}")]
    Unavailable(String),

    #[error("Handler timed out after {0:?}")]
    Timeout(Duration),

    #[error("Agent request failed: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Invalid handler response: {0}")]
    InvalidResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Handler call cancelled: {0}")]
    Cancelled(String),
}

impl HandlerError {
    /// Stable machine-readable label, used in outcomes and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Unavailable(_) => "unavailable",
            HandlerError::Timeout(_) => "timeout",
            HandlerError::Status { .. } => "status",
            HandlerError::InvalidResponse(_) => "invalid_response",
            HandlerError::Transport(_) => "transport",
            HandlerError::Cancelled(_) => "cancelled",
        }
    }
}

/// One call to a handler
#[derive(Debug, Clone, Serialize)]
pub struct HandlerRequest {
    #[serde(skip)]
    pub handler: HandlerName,

    pub task: String,

    pub payload: JsonValue,

    #[serde(skip)]
    pub request_id: String,
}

#[async_trait]
pub trait HandlerClient: Send + Sync {
    async fn call(&self, request: &HandlerRequest) -> Result<JsonValue, HandlerError>;
}

#[derive(Debug, Clone)]
struct Endpoint {
    url: Url,
    timeout: Duration,
    enabled: bool,
}

/// `HandlerClient` over a shared reqwest connection pool
#[derive(Debug, Clone)]
pub struct HttpHandlerClient {
    http: reqwest::Client,
    endpoints: BTreeMap<HandlerName, Endpoint>,
}

impl HttpHandlerClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nphies-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        let mut endpoints = BTreeMap::new();
        for name in HandlerName::ALL {
            let Some(handler) = config.handler(name) else {
                continue;
            };
            let url = handler
                .endpoint()
                .map_err(|e| anyhow::anyhow!("handlers.{name}: invalid URL: {e}"))?;
            endpoints.insert(
                name,
                Endpoint {
                    url,
                    timeout: config.handler_timeout(name),
                    enabled: handler.enabled,
                },
            );
        }

        Ok(Self { http, endpoints })
    }

    fn map_send_error(err: reqwest::Error, timeout: Duration) -> HandlerError {
        if err.is_timeout() {
            HandlerError::Timeout(timeout)
        } else if err.is_connect() {
            HandlerError::Unavailable(err.to_string())
        } else {
            HandlerError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl HandlerClient for HttpHandlerClient {
    async fn call(&self, request: &HandlerRequest) -> Result<JsonValue, HandlerError> {
        let endpoint = self.endpoints.get(&request.handler).ok_or_else(|| {
            HandlerError::Unavailable(format!("{} is not configured", request.handler))
        })?;
        if !endpoint.enabled {
            return Err(HandlerError::Unavailable(format!(
                "{} is disabled",
                request.handler
            )));
        }

        let response = self
            .http
            .post(endpoint.url.clone())
            .timeout(endpoint.timeout)
            .header(TASK_HEADER, &request.task)
            .header(REQUEST_ID_HEADER, &request.request_id)
            .json(request)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, endpoint.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_send_error(e, endpoint.timeout))?;

        if !status.is_success() {
            return Err(HandlerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(JsonValue::Null);
        }

        serde_json::from_str(&body).map_err(|e| HandlerError::InvalidResponse(e.to_string()))
    }
}
