//! NPHIES bundle routes
//!
//! Served at the root and again under `/nphies` for senders configured
//! against the older path layout.

use crate::api::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn nphies_routes() -> Router<AppState> {
    Router::new()
        .route("/extract", post(handlers::extract_bundle))
        .route("/process", post(handlers::process_bundle))
        .route(
            "/transform/:message_type",
            get(handlers::transform_bundle).post(handlers::transform_bundle),
        )
        .route("/supported-profiles", get(handlers::supported_profiles))
        .route("/health", get(handlers::health_check))
}
