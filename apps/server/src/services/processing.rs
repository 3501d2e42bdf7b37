//! Bundle processing service
//!
//! Drives one inbound bundle through the pipeline:
//! classify and extract, look up the routes, dispatch to the handlers, then
//! build the acknowledgement. Only a bundle that cannot be read at all is an
//! error; everything after extraction is reported inside the result.

use crate::dispatch::{skip_reason, transform, DispatchOutcome, Dispatcher, OverallStatus, WorkItem};
use crate::metrics;
use crate::response::build_acknowledgement;
use crate::routing::{HandlerName, Route, RoutingPolicy};
use crate::Result;
use nphies_extract::extract_bundle;
use nphies_models::{Bundle, ClaimSummary, ExtractedData, MessageType, ResourceCounts};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// How the dispatch step of `/process` was run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    Inline,
    Background,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub message_type: MessageType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,

    pub target_agents: Vec<HandlerName>,

    pub dispatch: DispatchMode,

    /// Absent when dispatch runs in the background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_status: Option<OverallStatus>,

    pub counts: ResourceCounts,

    pub claims: Vec<ClaimSummary>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<DispatchOutcome>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledgement: Option<Bundle>,
}

/// Payloads one handler would receive
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerPreview {
    #[serde(rename = "handlerName")]
    pub handler: HandlerName,
    pub task: String,
    pub items: Vec<WorkItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub message_type: MessageType,

    /// What the bundle itself classifies as
    pub detected_message_type: MessageType,

    pub handlers: Vec<HandlerPreview>,
}

#[derive(Clone)]
pub struct ProcessingService {
    routing: Arc<RoutingPolicy>,
    dispatcher: Arc<Dispatcher>,
}

impl ProcessingService {
    pub fn new(routing: Arc<RoutingPolicy>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            routing,
            dispatcher,
        }
    }

    /// Classify and extract a raw bundle.
    pub fn extract(&self, bundle: &JsonValue) -> Result<ExtractedData> {
        let started = Instant::now();
        let data = extract_bundle(bundle)?;
        metrics::record_extraction_warnings(data.warnings.len());

        tracing::info!(
            message_type = %data.message_type,
            bundle_id = data.bundle_id.as_deref().unwrap_or_default(),
            claims = data.claims.len(),
            patients = data.patients.len(),
            skipped_entries = data.warnings.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Bundle extracted"
        );
        Ok(data)
    }

    /// Run the whole pipeline for one bundle.
    pub async fn process(
        &self,
        bundle: &JsonValue,
        request_id: &str,
        mode: DispatchMode,
    ) -> Result<ProcessResult> {
        let data = Arc::new(self.extract(bundle)?);
        let message_type = data.message_type;
        let routes = self.routing.routes(message_type).to_vec();

        if routes.is_empty() {
            tracing::info!(message_type = %message_type, "No handlers mapped for message type");
        }

        let mut result = ProcessResult {
            message_type,
            bundle_id: data.bundle_id.clone(),
            target_agents: routes.iter().map(|r| r.handler).collect(),
            dispatch: mode,
            overall_status: None,
            counts: data.counts(),
            claims: data.claims.iter().map(|c| c.summary()).collect(),
            outcomes: Vec::new(),
            acknowledgement: None,
        };

        match mode {
            DispatchMode::Inline => {
                let outcomes = run_dispatch(&self.dispatcher, data.clone(), &routes, request_id).await;
                let overall = OverallStatus::from_outcomes(&outcomes);
                result.acknowledgement = Some(build_acknowledgement(message_type, overall, &data));
                result.overall_status = Some(overall);
                result.outcomes = outcomes;
            }
            DispatchMode::Background => {
                let dispatcher = self.dispatcher.clone();
                let request_id = request_id.to_string();
                let span = tracing::info_span!(
                    "background_dispatch",
                    message_type = %message_type,
                    request_id = %request_id
                );
                tokio::spawn(
                    async move {
                        run_dispatch(&dispatcher, data, &routes, &request_id).await;
                    }
                    .instrument(span),
                );
            }
        }

        Ok(result)
    }

    /// Payloads the routed handlers for `message_type` would receive, without calling them.
    pub fn transform(&self, bundle: &JsonValue, message_type: MessageType) -> Result<TransformResult> {
        let data = self.extract(bundle)?;
        if data.message_type != message_type {
            tracing::debug!(
                requested = %message_type,
                detected = %data.message_type,
                "Transforming bundle as a different message type"
            );
        }

        let handlers = self
            .routing
            .routes(message_type)
            .iter()
            .map(|route| preview(route, &data))
            .collect();

        Ok(TransformResult {
            message_type,
            detected_message_type: data.message_type,
            handlers,
        })
    }
}

fn preview(route: &Route, data: &ExtractedData) -> HandlerPreview {
    let items = transform(route.handler, &route.task, data);
    let skipped = items.is_empty().then(|| skip_reason(route.handler));
    HandlerPreview {
        handler: route.handler,
        task: route.task.clone(),
        items,
        skipped,
    }
}

async fn run_dispatch(
    dispatcher: &Dispatcher,
    data: Arc<ExtractedData>,
    routes: &[Route],
    request_id: &str,
) -> Vec<DispatchOutcome> {
    let message_type = data.message_type;
    let started = Instant::now();
    let outcomes = dispatcher.dispatch(data, routes, request_id).await;
    let overall = OverallStatus::from_outcomes(&outcomes);

    metrics::record_bundle(message_type.as_str(), overall.as_str());
    tracing::info!(
        message_type = %message_type,
        handlers = outcomes.len(),
        failed = outcomes.iter().filter(|o| !o.is_success()).count(),
        overall_status = %overall,
        duration_ms = started.elapsed().as_millis() as u64,
        "Bundle dispatched"
    );
    outcomes
}
