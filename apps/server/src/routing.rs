//! Routing policy
//!
//! Maps each message type to the ordered handlers that process it, and the
//! task each handler is asked to perform. Built once at startup from the
//! built-in table plus any configured overrides; read-only afterwards.

use crate::config::Config;
use nphies_models::MessageType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Downstream HealthLinc handlers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HandlerName {
    Claimlinc,
    Recordlinc,
    Authlinc,
    Notifylinc,
    Doculinc,
    Matchlinc,
    Reviewerlinc,
    Claimtrackerlinc,
}

impl HandlerName {
    pub const ALL: [HandlerName; 8] = [
        HandlerName::Claimlinc,
        HandlerName::Recordlinc,
        HandlerName::Authlinc,
        HandlerName::Notifylinc,
        HandlerName::Doculinc,
        HandlerName::Matchlinc,
        HandlerName::Reviewerlinc,
        HandlerName::Claimtrackerlinc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerName::Claimlinc => "claimlinc",
            HandlerName::Recordlinc => "recordlinc",
            HandlerName::Authlinc => "authlinc",
            HandlerName::Notifylinc => "notifylinc",
            HandlerName::Doculinc => "doculinc",
            HandlerName::Matchlinc => "matchlinc",
            HandlerName::Reviewerlinc => "reviewerlinc",
            HandlerName::Claimtrackerlinc => "claimtrackerlinc",
        }
    }

    /// Task used when a route names the handler without one.
    pub fn default_task(&self) -> &'static str {
        match self {
            HandlerName::Claimlinc => tasks::SUBMIT,
            HandlerName::Recordlinc => tasks::CREATE,
            HandlerName::Authlinc => tasks::VALIDATE,
            HandlerName::Notifylinc => tasks::SEND,
            HandlerName::Doculinc => tasks::ENHANCE,
            HandlerName::Matchlinc => tasks::VALIDATE,
            HandlerName::Reviewerlinc => tasks::FEE_SCHEDULE,
            HandlerName::Claimtrackerlinc => tasks::CHECK_DUPLICATE,
        }
    }
}

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("Unknown handler: {0}")]
    UnknownHandler(String),

    #[error("Empty task in route '{0}'")]
    EmptyTask(String),
}

impl FromStr for HandlerName {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HandlerName::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| RoutingError::UnknownHandler(s.to_string()))
    }
}

/// Task verbs understood by the handlers
pub mod tasks {
    pub const SUBMIT: &str = "submit";
    pub const CHECK: &str = "check";
    pub const CREATE: &str = "create";
    pub const VALIDATE: &str = "validate";
    pub const PREAUTH: &str = "preauth";
    pub const SEND: &str = "send";
    pub const ENHANCE: &str = "enhance";
    pub const FEE_SCHEDULE: &str = "fee_schedule";
    pub const CHECK_DUPLICATE: &str = "check_duplicate";
}

/// One routing entry: which handler, doing what
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub handler: HandlerName,
    pub task: String,
}

impl Route {
    pub fn new(handler: HandlerName, task: impl Into<String>) -> Self {
        Self {
            handler,
            task: task.into(),
        }
    }
}

/// Parses `handler` or `handler:task`.
impl FromStr for Route {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (handler, task) = match s.split_once(':') {
            Some((handler, task)) => (handler.trim(), Some(task.trim())),
            None => (s.trim(), None),
        };
        let handler = HandlerName::from_str(handler)?;
        match task {
            Some("") => Err(RoutingError::EmptyTask(s.to_string())),
            Some(task) => Ok(Route::new(handler, task)),
            None => Ok(Route::new(handler, handler.default_task())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.handler, self.task)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPolicy {
    table: BTreeMap<MessageType, Vec<Route>>,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        use tasks::*;
        use HandlerName::*;
        use MessageType::*;

        let table = [
            (EligibilityRequest, vec![(Authlinc, VALIDATE), (Recordlinc, CREATE)]),
            (EligibilityResponse, vec![(Authlinc, VALIDATE), (Notifylinc, SEND)]),
            (
                PriorauthRequest,
                vec![(Authlinc, PREAUTH), (Doculinc, ENHANCE), (Matchlinc, VALIDATE)],
            ),
            (
                PriorauthResponse,
                vec![(Authlinc, PREAUTH), (Notifylinc, SEND), (Doculinc, ENHANCE)],
            ),
            (
                ClaimRequest,
                vec![(Claimlinc, SUBMIT), (Claimtrackerlinc, CHECK_DUPLICATE), (Matchlinc, VALIDATE)],
            ),
            (
                ClaimResponse,
                vec![(Claimlinc, CHECK), (Notifylinc, SEND), (Claimtrackerlinc, CHECK_DUPLICATE)],
            ),
            (CommunicationRequest, vec![(Notifylinc, SEND), (Doculinc, ENHANCE)]),
            (CommunicationResponse, vec![(Notifylinc, SEND)]),
            (PrescriberRequest, vec![(Matchlinc, VALIDATE), (Reviewerlinc, FEE_SCHEDULE)]),
            (PrescriberResponse, vec![(Reviewerlinc, FEE_SCHEDULE), (Notifylinc, SEND)]),
            (PaymentNotice, vec![(Claimlinc, CHECK), (Notifylinc, SEND)]),
            (PaymentReconciliation, vec![(Claimlinc, CHECK), (Reviewerlinc, FEE_SCHEDULE)]),
        ]
        .into_iter()
        .map(|(message_type, routes)| {
            let routes = routes
                .into_iter()
                .map(|(handler, task)| Route::new(handler, task))
                .collect();
            (message_type, routes)
        })
        .collect();

        Self { table }
    }
}

impl RoutingPolicy {
    /// Built-in table with the configured overrides applied. Each override
    /// replaces the whole entry for its message type.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut policy = Self::default();
        for (message_type, routes) in &config.routing {
            let message_type = MessageType::from_str(message_type)?;
            let routes = routes
                .iter()
                .map(|r| Route::from_str(r))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::info!(
                message_type = %message_type,
                routes = ?routes.iter().map(Route::to_string).collect::<Vec<_>>(),
                "Routing override applied"
            );
            policy.table.insert(message_type, routes);
        }
        Ok(policy)
    }

    /// Routes for a message type, in dispatch order. Empty when unmapped.
    pub fn routes(&self, message_type: MessageType) -> &[Route] {
        self.table
            .get(&message_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn handlers(&self, message_type: MessageType) -> Vec<HandlerName> {
        self.routes(message_type).iter().map(|r| r.handler).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_message_type_is_routed() {
        let policy = RoutingPolicy::default();
        for message_type in MessageType::ALL {
            assert!(
                !policy.routes(message_type).is_empty(),
                "{message_type} has no routes"
            );
        }
    }

    #[test]
    fn test_claim_request_routes() {
        let policy = RoutingPolicy::default();
        assert_eq!(
            policy.handlers(MessageType::ClaimRequest),
            vec![
                HandlerName::Claimlinc,
                HandlerName::Claimtrackerlinc,
                HandlerName::Matchlinc
            ]
        );
        assert_eq!(policy.routes(MessageType::ClaimRequest)[0].task, tasks::SUBMIT);
    }

    #[test]
    fn test_payment_routes() {
        let policy = RoutingPolicy::default();
        assert_eq!(
            policy.routes(MessageType::PaymentNotice),
            [
                Route::new(HandlerName::Claimlinc, tasks::CHECK),
                Route::new(HandlerName::Notifylinc, tasks::SEND),
            ]
        );
        assert_eq!(
            policy.routes(MessageType::PaymentReconciliation),
            [
                Route::new(HandlerName::Claimlinc, tasks::CHECK),
                Route::new(HandlerName::Reviewerlinc, tasks::FEE_SCHEDULE),
            ]
        );
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!(
            Route::from_str("doculinc:enhance").unwrap(),
            Route::new(HandlerName::Doculinc, "enhance")
        );
        assert_eq!(
            Route::from_str("reviewerlinc").unwrap(),
            Route::new(HandlerName::Reviewerlinc, tasks::FEE_SCHEDULE)
        );
        assert_eq!(
            Route::from_str("billinglinc:pay"),
            Err(RoutingError::UnknownHandler("billinglinc".to_string()))
        );
        assert!(matches!(
            Route::from_str("authlinc:"),
            Err(RoutingError::EmptyTask(_))
        ));
        assert_eq!(Route::new(HandlerName::Authlinc, "preauth").to_string(), "authlinc:preauth");
    }

    #[test]
    fn test_override_replaces_entry() {
        let mut config = Config::default();
        config.routing.insert(
            "communication-response".to_string(),
            vec!["notifylinc:send".to_string(), "doculinc".to_string()],
        );
        config
            .routing
            .insert("payment-notice".to_string(), Vec::new());

        let policy = RoutingPolicy::from_config(&config).unwrap();
        assert_eq!(
            policy.handlers(MessageType::CommunicationResponse),
            vec![HandlerName::Notifylinc, HandlerName::Doculinc]
        );
        assert!(policy.routes(MessageType::PaymentNotice).is_empty());
        assert_eq!(
            policy.routes(MessageType::ClaimRequest),
            RoutingPolicy::default().routes(MessageType::ClaimRequest)
        );
    }
}
