//! Concurrent handler dispatch
//!
//! Every route of a bundle runs on its own tokio task; the tasks share only
//! the immutable `ExtractedData` and are joined together. Work items inside
//! one route run sequentially in sequence order. Each outbound call takes a
//! permit from a process-wide semaphore. Outcomes come back in route order
//! whatever order the handlers finish in.

pub mod client;
pub mod transform;

pub use client::{HandlerClient, HandlerError, HandlerRequest, HttpHandlerClient};
pub use transform::{skip_reason, transform, WorkItem};

use crate::metrics;
use crate::routing::{HandlerName, Route};
use futures::future::join_all;
use nphies_models::ExtractedData;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Error,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "success",
            OutcomeStatus::Error => "error",
        }
    }
}

/// Result of one work item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub sequence: usize,
    pub task: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    pub status: OutcomeStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<JsonValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Exactly one per routed handler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    #[serde(rename = "handlerName")]
    pub handler: HandlerName,
    pub task: String,
    pub status: OutcomeStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemResult>,

    pub duration_ms: u64,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    fn skipped(route: &Route) -> Self {
        Self {
            handler: route.handler,
            task: route.task.clone(),
            status: OutcomeStatus::Success,
            payload: Some(json!({
                "status": "skipped",
                "reason": skip_reason(route.handler),
            })),
            error: None,
            error_kind: None,
            items: Vec::new(),
            duration_ms: 0,
        }
    }

    fn failed(route: &Route, error: HandlerError) -> Self {
        Self {
            handler: route.handler,
            task: route.task.clone(),
            status: OutcomeStatus::Error,
            payload: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            items: Vec::new(),
            duration_ms: 0,
        }
    }
}

/// Aggregate status of one bundle's dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Success,
    PartialSuccess,
    Failed,
}

impl OverallStatus {
    /// `success` when every outcome succeeded, `partial_success` when some
    /// did, `failed` when none did or there were none.
    pub fn from_outcomes(outcomes: &[DispatchOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        match succeeded {
            0 => OverallStatus::Failed,
            n if n == outcomes.len() => OverallStatus::Success,
            _ => OverallStatus::PartialSuccess,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Success => "success",
            OverallStatus::PartialSuccess => "partial_success",
            OverallStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn HandlerClient>,
    limiter: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn HandlerClient>, max_concurrent_calls: usize) -> Self {
        Self {
            client,
            limiter: Arc::new(Semaphore::new(max_concurrent_calls)),
        }
    }

    /// Run every route against the snapshot and collect one outcome per route.
    pub async fn dispatch(
        &self,
        data: Arc<ExtractedData>,
        routes: &[Route],
        request_id: &str,
    ) -> Vec<DispatchOutcome> {
        let handles = routes.iter().map(|route| {
            let span = tracing::info_span!(
                "handler_dispatch",
                handler = %route.handler,
                task = %route.task,
                request_id = %request_id,
            );
            let run = run_route(
                self.client.clone(),
                self.limiter.clone(),
                data.clone(),
                route.clone(),
                request_id.to_string(),
            );
            tokio::spawn(run.instrument(span))
        });

        let results = join_all(handles).await;

        routes
            .iter()
            .zip(results)
            .map(|(route, result)| {
                result.unwrap_or_else(|e| {
                    tracing::error!(handler = %route.handler, "Handler task aborted: {}", e);
                    metrics::record_handler_call(route.handler.as_str(), "cancelled", 0.0);
                    DispatchOutcome::failed(route, HandlerError::Cancelled(e.to_string()))
                })
            })
            .collect()
    }
}

async fn run_route(
    client: Arc<dyn HandlerClient>,
    limiter: Arc<Semaphore>,
    data: Arc<ExtractedData>,
    route: Route,
    request_id: String,
) -> DispatchOutcome {
    let work = transform(route.handler, &route.task, &data);
    if work.is_empty() {
        tracing::debug!(reason = skip_reason(route.handler), "Handler skipped");
        return DispatchOutcome::skipped(&route);
    }

    let started = Instant::now();
    let mut items = Vec::with_capacity(work.len());
    let mut first_error: Option<HandlerError> = None;

    for item in work {
        let result = call_item(client.as_ref(), &limiter, &route, &item, &request_id).await;
        let (status, response, error) = match result {
            Ok(response) => (OutcomeStatus::Success, Some(response), None),
            Err(e) => {
                let message = e.to_string();
                first_error.get_or_insert(e);
                (OutcomeStatus::Error, None, Some(message))
            }
        };
        items.push(ItemResult {
            sequence: item.sequence,
            task: item.task,
            subject: item.subject,
            status,
            response,
            error,
        });
    }

    let duration_ms = started.elapsed().as_millis() as u64;
    let outcome = match first_error {
        None => DispatchOutcome {
            handler: route.handler,
            task: route.task.clone(),
            status: OutcomeStatus::Success,
            payload: Some(json!({
                "status": "processed",
                "results": items.iter().map(|i| i.response.clone()).collect::<Vec<_>>(),
            })),
            error: None,
            error_kind: None,
            items,
            duration_ms,
        },
        Some(error) => DispatchOutcome {
            items,
            duration_ms,
            ..DispatchOutcome::failed(&route, error)
        },
    };

    match outcome.status {
        OutcomeStatus::Success => tracing::info!(
            items = outcome.items.len(),
            duration_ms,
            "Handler succeeded"
        ),
        OutcomeStatus::Error => tracing::warn!(
            items = outcome.items.len(),
            error_kind = outcome.error_kind,
            duration_ms,
            "Handler failed: {}",
            outcome.error.as_deref().unwrap_or_default()
        ),
    }

    outcome
}

async fn call_item(
    client: &dyn HandlerClient,
    limiter: &Semaphore,
    route: &Route,
    item: &WorkItem,
    request_id: &str,
) -> Result<JsonValue, HandlerError> {
    let _permit = limiter
        .acquire()
        .await
        .map_err(|e| HandlerError::Cancelled(e.to_string()))?;

    let request = HandlerRequest {
        handler: route.handler,
        task: item.task.clone(),
        payload: item.payload.clone(),
        request_id: request_id.to_string(),
    };

    let started = Instant::now();
    let result = client.call(&request).await;
    let elapsed = started.elapsed();

    let label = match &result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    metrics::record_handler_call(route.handler.as_str(), label, elapsed.as_secs_f64());
    tracing::debug!(
        sequence = item.sequence,
        task = %item.task,
        status = label,
        duration_ms = elapsed.as_millis() as u64,
        "Handler call finished"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::tasks;
    use async_trait::async_trait;
    use nphies_models::{ClaimRecord, MessageType};
    use quickcheck::{QuickCheck, TestResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replies per handler after a handler-specific delay and records every request.
    struct ScriptedClient {
        failing: Vec<HandlerName>,
        delays: Vec<(HandlerName, u64)>,
        seen: Mutex<Vec<(HandlerName, String)>>,
    }

    impl ScriptedClient {
        fn new(failing: Vec<HandlerName>) -> Self {
            Self {
                failing,
                delays: Vec::new(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HandlerClient for ScriptedClient {
        async fn call(&self, request: &HandlerRequest) -> Result<JsonValue, HandlerError> {
            if let Some((_, ms)) = self.delays.iter().find(|(h, _)| *h == request.handler) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.seen
                .lock()
                .unwrap()
                .push((request.handler, request.task.clone()));
            if self.failing.contains(&request.handler) {
                Err(HandlerError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(json!({"accepted": true}))
            }
        }
    }

    fn claims(n: usize) -> Arc<ExtractedData> {
        let mut data = ExtractedData::new(MessageType::ClaimRequest);
        for i in 0..n {
            data.claims.push(ClaimRecord {
                id: Some(format!("c-{i}")),
                claim_use: Some("claim".to_string()),
                ..Default::default()
            });
        }
        Arc::new(data)
    }

    fn routes() -> Vec<Route> {
        vec![
            Route::new(HandlerName::Claimlinc, tasks::SUBMIT),
            Route::new(HandlerName::Claimtrackerlinc, tasks::CHECK_DUPLICATE),
            Route::new(HandlerName::Matchlinc, tasks::VALIDATE),
        ]
    }

    #[tokio::test]
    async fn test_outcomes_follow_route_order() -> anyhow::Result<()> {
        let mut client = ScriptedClient::new(vec![HandlerName::Claimtrackerlinc]);
        client.delays = vec![(HandlerName::Claimlinc, 40), (HandlerName::Matchlinc, 1)];
        let dispatcher = Dispatcher::new(Arc::new(client), 4);

        let outcomes = dispatcher.dispatch(claims(2), &routes(), "req-1").await;

        let handlers: Vec<_> = outcomes.iter().map(|o| o.handler).collect();
        assert_eq!(
            handlers,
            vec![
                HandlerName::Claimlinc,
                HandlerName::Claimtrackerlinc,
                HandlerName::Matchlinc
            ]
        );
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[0].items.len(), 2);
        assert_eq!(outcomes[1].status, OutcomeStatus::Error);
        assert_eq!(outcomes[1].error_kind, Some("status"));
        assert_eq!(
            OverallStatus::from_outcomes(&outcomes),
            OverallStatus::PartialSuccess
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_items_run_in_sequence() -> anyhow::Result<()> {
        let client = Arc::new(ScriptedClient::new(Vec::new()));
        let dispatcher = Dispatcher::new(client.clone(), 1);

        let route = [Route::new(HandlerName::Claimlinc, tasks::SUBMIT)];
        let outcomes = dispatcher.dispatch(claims(3), &route, "req-2").await;

        let sequences: Vec<_> = outcomes[0].items.iter().map(|i| i.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        let subjects: Vec<_> = outcomes[0]
            .items
            .iter()
            .map(|i| i.subject.clone().unwrap_or_default())
            .collect();
        assert_eq!(subjects, vec!["c-0", "c-1", "c-2"]);
        assert_eq!(client.seen.lock().unwrap().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_slice_is_skipped_without_call() -> anyhow::Result<()> {
        let client = Arc::new(ScriptedClient::new(Vec::new()));
        let dispatcher = Dispatcher::new(client.clone(), 2);

        let route = [Route::new(HandlerName::Notifylinc, tasks::SEND)];
        let outcomes = dispatcher.dispatch(claims(1), &route, "req-3").await;

        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[0].payload.as_ref().unwrap()["status"], "skipped");
        assert!(client.seen.lock().unwrap().is_empty());
        Ok(())
    }

    /// Records the highest number of calls in flight at once.
    #[derive(Default)]
    struct GaugeClient {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl HandlerClient for GaugeClient {
        async fn call(&self, _request: &HandlerRequest) -> Result<JsonValue, HandlerError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(json!({"accepted": true}))
        }
    }

    #[tokio::test]
    async fn test_call_limit_caps_concurrent_calls() -> anyhow::Result<()> {
        let serial = Arc::new(GaugeClient::default());
        let outcomes = Dispatcher::new(serial.clone(), 1)
            .dispatch(claims(2), &routes(), "req-5")
            .await;
        assert!(outcomes.iter().all(DispatchOutcome::is_success));
        assert_eq!(serial.peak.load(Ordering::SeqCst), 1);

        let parallel = Arc::new(GaugeClient::default());
        Dispatcher::new(parallel.clone(), 3)
            .dispatch(claims(2), &routes(), "req-6")
            .await;
        let peak = parallel.peak.load(Ordering::SeqCst);
        assert!(peak > 1 && peak <= 3, "peak {peak}");
        Ok(())
    }

    #[tokio::test]
    async fn test_no_routes_is_failed() -> anyhow::Result<()> {
        let dispatcher = Dispatcher::new(Arc::new(ScriptedClient::new(Vec::new())), 2);
        let outcomes = dispatcher.dispatch(claims(1), &[], "req-4").await;
        assert!(outcomes.is_empty());
        assert_eq!(OverallStatus::from_outcomes(&outcomes), OverallStatus::Failed);
        Ok(())
    }

    fn outcome(handler: HandlerName, ok: bool) -> DispatchOutcome {
        let route = Route::new(handler, handler.default_task());
        if ok {
            DispatchOutcome::skipped(&route)
        } else {
            DispatchOutcome::failed(&route, HandlerError::Timeout(Duration::from_secs(1)))
        }
    }

    #[test]
    fn prop_overall_status_counts_failures() {
        fn prop(results: Vec<bool>) -> TestResult {
            if results.is_empty() {
                return TestResult::discard();
            }
            let outcomes: Vec<_> = results
                .iter()
                .enumerate()
                .map(|(i, ok)| outcome(HandlerName::ALL[i % HandlerName::ALL.len()], *ok))
                .collect();
            let failures = results.iter().filter(|ok| !**ok).count();
            let expected = match failures {
                0 => OverallStatus::Success,
                k if k == results.len() => OverallStatus::Failed,
                _ => OverallStatus::PartialSuccess,
            };
            TestResult::from_bool(OverallStatus::from_outcomes(&outcomes) == expected)
        }

        QuickCheck::new()
            .tests(100)
            .quickcheck(prop as fn(Vec<bool>) -> TestResult);
    }

    #[test]
    fn test_outcome_serialization() {
        let failed = outcome(HandlerName::Doculinc, false);
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["handlerName"], "doculinc");
        assert!(value.get("handler").is_none());
        assert_eq!(value["status"], "error");
        assert_eq!(value["errorKind"], "timeout");
        assert!(value.get("payload").is_none());
        assert_eq!(
            serde_json::to_value(OverallStatus::PartialSuccess).unwrap(),
            "partial_success"
        );
    }
}
