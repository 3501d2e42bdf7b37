//! Bundle endpoints: extract, process, transform

use crate::api::envelope::Envelope;
use crate::api::extractors::BundleBody;
use crate::request_context::RequestContext;
use crate::services::DispatchMode;
use crate::state::AppState;
use crate::{Error, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use nphies_models::MessageType;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Default, Deserialize)]
pub struct ProcessParams {
    /// Overrides `dispatch.background` for this request
    pub background: Option<bool>,
}

/// `POST /extract`
pub async fn extract_bundle(
    State(state): State<AppState>,
    BundleBody(bundle): BundleBody,
) -> Result<impl IntoResponse> {
    let data = state.processing_service.extract(&bundle)?;
    Ok(Json(
        Envelope::success(data).with_message("NPHIES bundle data extracted successfully"),
    ))
}

/// `POST /process`
pub async fn process_bundle(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<ProcessParams>,
    BundleBody(bundle): BundleBody,
) -> Result<impl IntoResponse> {
    let mode = if params.background.unwrap_or(state.config.dispatch.background) {
        DispatchMode::Background
    } else {
        DispatchMode::Inline
    };

    let result = state
        .processing_service
        .process(&bundle, &ctx.request_id, mode)
        .await?;

    let (status, message) = match (mode, result.overall_status) {
        (DispatchMode::Background, _) => (
            StatusCode::ACCEPTED,
            format!(
                "NPHIES message accepted for dispatch to {} handler(s)",
                result.target_agents.len()
            ),
        ),
        (DispatchMode::Inline, Some(overall)) => (
            StatusCode::OK,
            format!(
                "NPHIES message processed by {} handler(s): {}",
                result.target_agents.len(),
                overall
            ),
        ),
        (DispatchMode::Inline, None) => (StatusCode::OK, "NPHIES message processed".to_string()),
    };

    Ok((status, Json(Envelope::success(result).with_message(message))))
}

/// `GET|POST /transform/:message_type`
pub async fn transform_bundle(
    State(state): State<AppState>,
    Path(message_type): Path<String>,
    BundleBody(bundle): BundleBody,
) -> Result<impl IntoResponse> {
    let message_type = MessageType::from_str(&message_type)
        .map_err(|_| Error::UnknownMessageType(message_type))?;
    let result = state.processing_service.transform(&bundle, message_type)?;
    Ok(Json(
        Envelope::success(result).with_message("Data transformed to HealthLinc format"),
    ))
}
