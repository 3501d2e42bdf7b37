//! HTTP surface tests
//!
//! Tests cover:
//! - Health, service info, favicon and metrics endpoints
//! - `/extract` and `/transform/:message_type` envelopes
//! - 400 answers for unreadable bundles and unknown message types
//! - The same routes served under `/nphies`

#![allow(unused)]
#[allow(unused)]
mod support;

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use nphies_gateway::routing::HandlerName;
use serde_json::{json, Value};
use support::{
    assert_error_envelope, assert_status, assert_success_envelope, claim_request_bundle,
    communication_bundle_with_broken_entry, to_json_body, TestApp,
};

#[tokio::test]
async fn health_reports_healthy() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    for path in ["/health", "/nphies/health"] {
        let (status, headers, body) = app.request(Method::GET, path, None).await?;
        assert_status(status, StatusCode::OK, path);
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers["x-content-type-options"], "nosniff");

        let value: Value = serde_json::from_slice(&body)?;
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], "NPHIES Integration Service");
        assert!(value["timestamp"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints_and_routing() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, _, body) = app.request(Method::GET, "/", None).await?;
    assert_status(status, StatusCode::OK, "root");

    let value: Value = serde_json::from_slice(&body)?;
    assert_eq!(value["service"], "NPHIES Integration Service");
    assert!(value["endpoints"]
        .as_array()
        .unwrap()
        .contains(&json!("/process")));
    assert!(value["routing"]["claim-request"].is_array());
    Ok(())
}

#[tokio::test]
async fn favicon_has_no_content() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, body) = app.request(Method::GET, "/favicon.ico", None).await?;
    assert_status(status, StatusCode::NO_CONTENT, "favicon");
    assert!(body.is_empty());
    Ok(())
}

#[tokio::test]
async fn supported_profiles_lists_catalogue() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, _, body) = app
        .request(Method::GET, "/supported-profiles", None)
        .await?;
    assert_status(status, StatusCode::OK, "supported-profiles");

    let value: Value = serde_json::from_slice(&body)?;
    let data = assert_success_envelope(&value)?;
    assert!(data["profiles"].as_object().is_some_and(|p| !p.is_empty()));
    assert_eq!(data["message_types"].as_array().map(Vec::len), Some(12));
    Ok(())
}

#[tokio::test]
async fn extract_returns_canonical_data() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.post_json("/extract", &claim_request_bundle()).await?;
    assert_status(status, StatusCode::OK, "extract");
    assert_eq!(body["message"], "NPHIES bundle data extracted successfully");

    let data = assert_success_envelope(&body)?;
    assert_eq!(data["messageType"], "claim-request");
    assert_eq!(data["bundleId"], "b7c1d6a2-claim");
    assert_eq!(data["claims"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["patients"][0]["id"], "pat-1");

    // Extraction never calls a handler
    assert!(app.handlers.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn extract_reports_skipped_entries() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app
        .post_json("/extract", &communication_bundle_with_broken_entry())
        .await?;
    assert_status(status, StatusCode::OK, "extract with broken entry");

    let warnings = &body["data"]["warnings"];
    assert_eq!(warnings.as_array().map(Vec::len), Some(1));
    assert_eq!(warnings[0]["index"], 1);
    Ok(())
}

#[tokio::test]
async fn unreadable_bundles_are_rejected() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let cases: [(&str, Option<Bytes>); 4] = [
        ("empty body", None),
        ("invalid JSON", Some(Bytes::from_static(b"{not json"))),
        ("not an object", Some(to_json_body(&json!([1, 2, 3]))?)),
        (
            "wrong resourceType",
            Some(to_json_body(&json!({"resourceType": "Patient"}))?),
        ),
    ];

    for (context, body) in cases {
        for path in ["/extract", "/process"] {
            let (status, _, bytes) = app.request(Method::POST, path, body.clone()).await?;
            assert_status(status, StatusCode::BAD_REQUEST, context);
            let value: Value = serde_json::from_slice(&bytes)?;
            assert_error_envelope(&value)?;
        }
    }

    assert!(app.handlers.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn entry_must_be_an_array() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let bundle = json!({"resourceType": "Bundle", "type": "message", "entry": {}});
    let (status, body) = app.post_json("/extract", &bundle).await?;
    assert_status(status, StatusCode::BAD_REQUEST, "entry object");
    assert!(assert_error_envelope(&body)?.contains("Bundle.entry must be an array"));
    Ok(())
}

#[tokio::test]
async fn transform_previews_handler_payloads() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    for method in [Method::POST, Method::GET] {
        let (status, _, bytes) = app
            .request(
                method.clone(),
                "/transform/claim-request",
                Some(to_json_body(&claim_request_bundle())?),
            )
            .await?;
        assert_status(status, StatusCode::OK, method.as_str());

        let value: Value = serde_json::from_slice(&bytes)?;
        let data = assert_success_envelope(&value)?;
        assert_eq!(data["messageType"], "claim-request");
        assert_eq!(data["detectedMessageType"], "claim-request");

        let handlers = data["handlers"].as_array().unwrap();
        assert_eq!(handlers.len(), 3);
        assert_eq!(handlers[0]["handlerName"], "claimlinc");
        assert_eq!(handlers[0]["items"][0]["task"], "submit");
    }

    // Nothing is dispatched
    assert!(app.handlers.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn transform_as_other_message_type() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app
        .post_json("/transform/eligibility-request", &claim_request_bundle())
        .await?;
    assert_status(status, StatusCode::OK, "transform as eligibility");

    let data = assert_success_envelope(&body)?;
    assert_eq!(data["messageType"], "eligibility-request");
    assert_eq!(data["detectedMessageType"], "claim-request");
    // No eligibility requests and the claim is not a preauthorization
    assert!(data["handlers"][0]["skipped"].is_string());
    Ok(())
}

#[tokio::test]
async fn transform_rejects_unknown_message_type() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app
        .post_json("/transform/invoice-request", &claim_request_bundle())
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "unknown message type");
    assert!(assert_error_envelope(&body)?.contains("invoice-request"));
    Ok(())
}

#[tokio::test]
async fn legacy_prefix_serves_the_same_routes() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app
        .post_json("/nphies/extract", &claim_request_bundle())
        .await?;
    assert_status(status, StatusCode::OK, "/nphies/extract");
    assert_eq!(body["data"]["messageType"], "claim-request");

    let (status, _, _) = app
        .request(Method::GET, "/nphies/supported-profiles", None)
        .await?;
    assert_status(status, StatusCode::OK, "/nphies/supported-profiles");
    Ok(())
}

#[tokio::test]
async fn unknown_path_is_not_found() -> anyhow::Result<()> {
    let app = TestApp::new().await?;
    let (status, _, _) = app.request(Method::GET, "/fhir/Patient", None).await?;
    assert_status(status, StatusCode::NOT_FOUND, "unknown path");
    Ok(())
}

#[tokio::test]
async fn metrics_exposes_prometheus_text() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    app.post_json("/process", &claim_request_bundle()).await?;

    let (status, headers, body) = app.request(Method::GET, "/metrics", None).await?;
    assert_status(status, StatusCode::OK, "metrics");
    assert!(headers["content-type"]
        .to_str()?
        .starts_with("text/plain"));

    let text = String::from_utf8(body.to_vec())?;
    assert!(text.contains("nphies_http_requests_total"));
    assert!(text.contains("nphies_bundles_total"));
    assert!(text.contains("nphies_handler_calls_total"));
    Ok(())
}

#[tokio::test]
async fn invalid_client_request_id_is_replaced() -> anyhow::Result<()> {
    let app = TestApp::new().await?;

    let long_id = "x".repeat(200);
    let (_, headers, _) = app
        .request_with_extra_headers(Method::GET, "/health", None, &[("x-request-id", &long_id)])
        .await?;

    assert_ne!(headers["x-request-id"], long_id.as_str());
    assert_eq!(headers["x-correlation-id"], long_id.as_str());
    Ok(())
}
