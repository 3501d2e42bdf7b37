//! Custom Axum extractors for inbound bundles.

use crate::api::envelope::Envelope;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value as JsonValue;

/// Request body parsed as JSON.
///
/// Only JSON syntax is checked here; whether the value is a usable Bundle is
/// decided by extraction. Any content type is accepted since NPHIES senders
/// use both `application/json` and `application/fhir+json`.
pub struct BundleBody(pub JsonValue);

/// Error type for [`BundleBody`] extraction failures.
pub struct BundleBodyRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for BundleBodyRejection {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope::error(self.message))).into_response()
    }
}

#[async_trait]
impl<S> FromRequest<S> for BundleBody
where
    S: Send + Sync,
{
    type Rejection = BundleBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            let status = e.status();
            BundleBodyRejection {
                status,
                message: format!("Failed to read request body: {}", e.body_text()),
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(BundleBodyRejection {
                status: StatusCode::BAD_REQUEST,
                message: "Request body is empty".to_string(),
            });
        }

        let value: JsonValue = serde_json::from_slice(&bytes).map_err(|e| BundleBodyRejection {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid JSON in request body: {}", e),
        })?;

        Ok(BundleBody(value))
    }
}
