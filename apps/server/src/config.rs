//! Gateway configuration
//!
//! Layered with the `config` crate, lowest precedence first:
//! built-in defaults, an optional config file (`NPHIES_CONFIG_FILE`, or
//! `./config.{toml,yaml,json}`), then `NPHIES__*` environment variables
//! (`__` separates sections, e.g. `NPHIES__SERVER__PORT=8080`). A `.env` file
//! is loaded into the environment first.

use crate::routing::{HandlerName, Route};
use nphies_models::MessageType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Downstream handlers keyed by handler name
    #[serde(default = "default_handlers")]
    pub handlers: BTreeMap<String, HandlerConfig>,

    /// Per-message-type overrides of the routing table, as `handler` or
    /// `handler:task` strings
    #[serde(default)]
    pub routing: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. Empty disables CORS headers.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_request_body_size")]
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub file_enabled: bool,

    #[serde(default = "default_log_directory")]
    pub file_directory: String,

    #[serde(default = "default_log_prefix")]
    pub file_prefix: String,

    /// daily, hourly, minutely or never
    #[serde(default = "default_log_rotation")]
    pub file_rotation: String,

    #[serde(default)]
    pub opentelemetry_enabled: bool,

    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,

    #[serde(default = "default_otlp_timeout_seconds")]
    pub otlp_timeout_seconds: u64,

    /// Extra gRPC metadata sent with every OTLP export (e.g. an API key)
    #[serde(default)]
    pub otlp_headers: BTreeMap<String, String>,

    #[serde(default = "default_trace_sample_ratio")]
    pub trace_sample_ratio: f64,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default)]
    pub service_version: Option<String>,

    #[serde(default = "default_environment")]
    pub deployment_environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Timeout for one outbound handler call
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Process-wide cap on concurrent outbound handler calls
    #[serde(default = "default_max_concurrent_calls")]
    pub max_concurrent_calls: usize,

    /// Run `/process` dispatch after responding instead of inline
    #[serde(default)]
    pub background: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub base_url: String,

    pub path: String,

    /// Overrides `dispatch.request_timeout_seconds` for this handler
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl HandlerConfig {
    fn local(port: u16, path: &str) -> Self {
        Self {
            base_url: format!("http://localhost:{port}"),
            path: path.to_string(),
            timeout_seconds: None,
            enabled: true,
        }
    }

    /// Full endpoint URL: base URL joined with the handler path.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3010
}

fn default_max_request_body_size() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_prefix() -> String {
    "nphies-gateway".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otlp_timeout_seconds() -> u64 {
    10
}

fn default_trace_sample_ratio() -> f64 {
    1.0
}

fn default_service_name() -> String {
    "nphies-gateway".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_max_concurrent_calls() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_handlers() -> BTreeMap<String, HandlerConfig> {
    [
        (HandlerName::Claimlinc, 3001, "agents/claim"),
        (HandlerName::Recordlinc, 3002, "agents/record"),
        (HandlerName::Authlinc, 3003, "agents/auth"),
        (HandlerName::Notifylinc, 3004, "agents/notify"),
        (HandlerName::Doculinc, 3005, "agents/document"),
        (HandlerName::Matchlinc, 3006, "agents/match"),
        (HandlerName::Reviewerlinc, 3007, "agents/review"),
        (HandlerName::Claimtrackerlinc, 3008, "agents/tracker"),
    ]
    .into_iter()
    .map(|(name, port, path)| (name.to_string(), HandlerConfig::local(port, path)))
    .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_request_body_size: default_max_request_body_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file_enabled: false,
            file_directory: default_log_directory(),
            file_prefix: default_log_prefix(),
            file_rotation: default_log_rotation(),
            opentelemetry_enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            otlp_timeout_seconds: default_otlp_timeout_seconds(),
            otlp_headers: BTreeMap::new(),
            trace_sample_ratio: default_trace_sample_ratio(),
            service_name: default_service_name(),
            service_version: None,
            deployment_environment: default_environment(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout_seconds(),
            max_concurrent_calls: default_max_concurrent_calls(),
            background: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            dispatch: DispatchConfig::default(),
            handlers: default_handlers(),
            routing: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        // A missing .env is the normal case outside development
        let _ = dotenvy::dotenv();

        let file = std::env::var("NPHIES_CONFIG_FILE").unwrap_or_else(|_| "config".to_string());

        ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?)
            .add_source(::config::File::with_name(&file).required(false))
            .add_source(
                ::config::Environment::with_prefix("NPHIES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?
            .try_deserialize()
    }

    /// Check invariants `serde` cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.dispatch.request_timeout_seconds == 0 {
            return Err("dispatch.request_timeout_seconds must be greater than 0".to_string());
        }
        if self.dispatch.max_concurrent_calls == 0 {
            return Err("dispatch.max_concurrent_calls must be greater than 0".to_string());
        }
        if self.server.max_request_body_size == 0 {
            return Err("server.max_request_body_size must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.logging.trace_sample_ratio) {
            return Err(format!(
                "logging.trace_sample_ratio must be within [0, 1], got {}",
                self.logging.trace_sample_ratio
            ));
        }
        IpAddr::from_str(&self.server.host)
            .map_err(|e| format!("server.host '{}' is not an IP address: {e}", self.server.host))?;

        for (name, handler) in &self.handlers {
            HandlerName::from_str(name).map_err(|e| format!("handlers.{name}: {e}"))?;
            handler
                .endpoint()
                .map_err(|e| format!("handlers.{name}: invalid URL '{}': {e}", handler.base_url))?;
            if handler.timeout_seconds == Some(0) {
                return Err(format!("handlers.{name}.timeout_seconds must be greater than 0"));
            }
        }

        for (message_type, routes) in &self.routing {
            MessageType::from_str(message_type).map_err(|e| format!("routing: {e}"))?;
            for route in routes {
                Route::from_str(route)
                    .map_err(|e| format!("routing.{message_type}: {e}"))?;
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = IpAddr::from_str(&self.server.host)?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Handler settings, or `None` when the handler is not configured.
    pub fn handler(&self, name: HandlerName) -> Option<&HandlerConfig> {
        self.handlers.get(name.as_str())
    }

    pub fn handler_timeout(&self, name: HandlerName) -> Duration {
        let seconds = self
            .handler(name)
            .and_then(|h| h.timeout_seconds)
            .unwrap_or(self.dispatch.request_timeout_seconds);
        Duration::from_secs(seconds)
    }
}
