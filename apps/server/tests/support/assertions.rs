use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// Assert the `{status, data, timestamp}` envelope and return `data`
pub fn assert_success_envelope(value: &Value) -> anyhow::Result<&Value> {
    assert_eq!(value["status"], "success", "envelope status: {value}");
    assert!(value["timestamp"].is_i64(), "timestamp is epoch millis");
    value.get("data").context("envelope has data")
}

/// Assert the error envelope and return its message
pub fn assert_error_envelope(value: &Value) -> anyhow::Result<&str> {
    assert_eq!(value["status"], "error", "envelope status: {value}");
    assert!(value.get("data").is_none(), "error envelope carries no data");
    value["message"].as_str().context("error envelope has message")
}

/// Outcome for `handler` in a ProcessResult
pub fn outcome_for<'a>(result: &'a Value, handler: &str) -> anyhow::Result<&'a Value> {
    result["outcomes"]
        .as_array()
        .context("outcomes is array")?
        .iter()
        .find(|o| o["handlerName"] == handler)
        .with_context(|| format!("outcome for {handler}"))
}
