pub mod assertions;
pub mod fixtures;
pub mod stub;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use nphies_gateway::{api::create_router, config::HandlerConfig, routing::HandlerName, AppState, Config};
use serde_json::Value;
use tower::ServiceExt as _;

pub use assertions::*;
pub use fixtures::*;
pub use stub::*;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub handlers: StubHandlers,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::new_with_config(&[], |_| {}).await
    }

    /// App wired to a fresh stub handler server. Handlers named in
    /// `failing` answer 500.
    pub async fn new_with_config(
        failing: &[HandlerName],
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Self> {
        Self::new_with_stub(StubBehaviour::failing(failing), configure).await
    }

    pub async fn new_with_stub(
        behaviour: StubBehaviour,
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Self> {
        init_tracing();

        let handlers = StubHandlers::spawn(&behaviour).await?;

        let mut config = Config::default();
        config.dispatch.request_timeout_seconds = 5;
        config.handlers = HandlerName::ALL
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    HandlerConfig {
                        base_url: handlers.base_url.clone(),
                        path: name.as_str().to_string(),
                        timeout_seconds: None,
                        enabled: true,
                    },
                )
            })
            .collect();
        configure(&mut config);

        let state = AppState::new(config).context("initialize AppState")?;
        let router = create_router(state.clone());

        Ok(Self {
            router,
            state,
            handlers,
        })
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path_and_query, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "gateway.example.sa")
            .header("content-type", "application/fhir+json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// POST a bundle and decode the JSON answer.
    pub async fn post_json(&self, path: &str, bundle: &Value) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _headers, body) = self
            .request(Method::POST, path, Some(to_json_body(bundle)?))
            .await?;
        let value = serde_json::from_slice(&body).context("decode response body")?;
        Ok((status, value))
    }
}

pub fn to_json_body(value: &Value) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

fn init_tracing() {
    use std::sync::OnceLock;
    use tracing_subscriber::prelude::*;
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "nphies_gateway=info,reqwest=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}
