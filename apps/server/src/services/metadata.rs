//! Metadata Service
//!
//! Static descriptions of the gateway: liveness, service info and the
//! catalogue of NPHIES profiles, code systems and message types it understands.

use crate::config::Config;
use crate::routing::RoutingPolicy;
use chrono::Utc;
use nphies_extract::Catalogue;
use nphies_models::MessageType;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

pub const SERVICE_NAME: &str = "NPHIES Integration Service";

pub struct MetadataService {
    config: Arc<Config>,
    routing: Arc<RoutingPolicy>,
}

impl MetadataService {
    pub fn new(config: Arc<Config>, routing: Arc<RoutingPolicy>) -> Self {
        Self { config, routing }
    }

    pub fn health(&self) -> JsonValue {
        json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "timestamp": Utc::now().to_rfc3339(),
        })
    }

    pub fn info(&self) -> JsonValue {
        json!({
            "service": SERVICE_NAME,
            "name": self.config.logging.service_name,
            "version": env!("CARGO_PKG_VERSION"),
            "environment": self.config.logging.deployment_environment,
            "endpoints": [
                "/extract",
                "/process",
                "/transform/{messageType}",
                "/supported-profiles",
                "/health",
                "/metrics"
            ],
            "routing": self.routing_table(),
        })
    }

    pub fn supported_profiles(&self) -> Catalogue {
        Catalogue
    }

    /// Effective routing table, `message-type -> ["handler:task", ...]`
    pub fn routing_table(&self) -> JsonValue {
        let table: serde_json::Map<String, JsonValue> = MessageType::ALL
            .iter()
            .map(|mt| {
                let routes: Vec<String> = self
                    .routing
                    .routes(*mt)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                (mt.as_str().to_string(), json!(routes))
            })
            .collect();
        JsonValue::Object(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MetadataService {
        MetadataService::new(
            Arc::new(Config::default()),
            Arc::new(RoutingPolicy::default()),
        )
    }

    #[test]
    fn test_health() {
        let health = service().health();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["service"], SERVICE_NAME);
    }

    #[test]
    fn test_routing_table_lists_every_message_type() {
        let table = service().routing_table();
        assert_eq!(table.as_object().unwrap().len(), MessageType::ALL.len());
        assert_eq!(
            table["eligibility-request"],
            json!(["authlinc:validate", "recordlinc:create"])
        );
    }
}
