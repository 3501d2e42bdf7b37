//! Service metadata handlers

use crate::api::envelope::Envelope;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metadata_service.health())
}

/// `GET /`
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metadata_service.info())
}

/// `GET /supported-profiles`
pub async fn supported_profiles(State(state): State<AppState>) -> impl IntoResponse {
    Json(Envelope::success(state.metadata_service.supported_profiles()))
}

/// Return 204 No Content to indicate no favicon is available
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
