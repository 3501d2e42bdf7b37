//! Shared application state

use crate::config::Config;
use crate::dispatch::{Dispatcher, HandlerClient, HttpHandlerClient};
use crate::routing::RoutingPolicy;
use crate::services::{MetadataService, ProcessingService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub routing: Arc<RoutingPolicy>,
    pub processing_service: Arc<ProcessingService>,
    pub metadata_service: Arc<MetadataService>,
}

impl AppState {
    /// State backed by the HTTP handler client built from `config`.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = HttpHandlerClient::new(&config)?;
        Self::with_client(config, Arc::new(client))
    }

    /// State with a caller-supplied handler client.
    pub fn with_client(config: Config, client: Arc<dyn HandlerClient>) -> anyhow::Result<Self> {
        let routing = Arc::new(RoutingPolicy::from_config(&config)?);
        let dispatcher = Arc::new(Dispatcher::new(client, config.dispatch.max_concurrent_calls));
        let config = Arc::new(config);

        tracing::info!(
            handlers = config.handlers.len(),
            routing_overrides = config.routing.len(),
            max_concurrent_calls = config.dispatch.max_concurrent_calls,
            "Application state initialized"
        );

        Ok(Self {
            processing_service: Arc::new(ProcessingService::new(routing.clone(), dispatcher)),
            metadata_service: Arc::new(MetadataService::new(config.clone(), routing.clone())),
            routing,
            config,
        })
    }
}
