//! Request ID middleware with OpenTelemetry trace context injection

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use opentelemetry::trace::TraceContextExt;
use std::time::Instant;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use uuid::Uuid;

use crate::request_context::RequestContext;

const MAX_REQUEST_ID_LEN: usize = 128;

/// Accepts a caller-supplied request id when it is usable as a header value
/// on the outbound handler calls.
fn usable_request_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic())
}

/// Creates the root span for each HTTP request.
///
/// The caller's `X-Request-Id` is kept when usable, otherwise a fresh one is
/// generated. Either way it is stored in [`RequestContext`] so the dispatcher
/// forwards the same id to every handler, and it is returned on the
/// response together with the trace id. A rejected caller id is echoed back
/// as `X-Correlation-Id`.
#[tracing::instrument(
    name = "http_request",
    skip_all,
    fields(
        http.method = %req.method(),
        http.route = %req.uri().path(),
        http.scheme = %req.uri().scheme_str().unwrap_or("http"),
        otel.kind = "server",
        http.response.status_code = tracing::field::Empty,
        nphies.route = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
)]
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let current_span = Span::current();
    let start = Instant::now();

    let client_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string());

    let request_id = match client_id.as_deref() {
        Some(id) if usable_request_id(id) => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    current_span.record("request_id", request_id.as_str());

    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let path = req.uri().path().to_string();
    let method = req.method().clone();
    current_span.record(
        "nphies.route",
        crate::metrics::sanitize_path(&path).as_str(),
    );

    tracing::debug!(
        method = %method,
        path = %path,
        request_id = %request_id,
        "Incoming request"
    );

    let mut response = next.run(req).await;

    let status = response.status();
    let duration = start.elapsed();
    current_span.record("http.response.status_code", status.as_u16());

    tracing::info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = duration.as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", value);
    }

    let trace_id = current_span
        .context()
        .span()
        .span_context()
        .trace_id()
        .to_string();
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        headers.insert("x-trace-id", value);
    }

    if let Some(client_id) = client_id {
        if client_id != request_id {
            if let Ok(value) = HeaderValue::from_str(&client_id) {
                headers.insert("x-correlation-id", value);
            }
        }
    }

    response
}
