//! Logging and OpenTelemetry initialization for the gateway binary
//!
//! Request and dispatch spans are exported over OTLP when enabled. Console
//! output is always on, with an optional rotating log file in the same format.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{Sampler, TracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::resource as semconv;
use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;
use tonic::metadata::{MetadataKey, MetadataMap, MetadataValue};
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Keeps the file writer flushing and shuts the tracer provider down on drop.
/// Hold it for the lifetime of `main`.
pub struct TelemetryGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` overrides the configured level. An OTLP exporter that cannot
/// be built is logged and skipped rather than failing startup.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<TelemetryGuard> {
    let mut otel_init_error: Option<String> = None;
    let tracer_provider = if config.opentelemetry_enabled {
        match init_tracer_provider(config, build_resource_attributes(config)) {
            Ok(provider) => Some(provider),
            Err(e) => {
                otel_init_error = Some(e.to_string());
                None
            }
        }
    } else {
        None
    };

    // None is a no-op layer, so both cases share one subscriber stack
    let otel_layer = tracer_provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer()
            .with_tracer(provider.tracer("nphies-gateway"))
            .with_tracked_inactivity(true)
    });

    let (outputs, file_guard) = output_layers(config)?;

    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(otel_layer)
        .with(outputs)
        .init();

    if let Some(provider) = tracer_provider {
        global::set_tracer_provider(provider);
    }

    if let Some(err) = otel_init_error {
        tracing::warn!(
            error = %err,
            "Failed to initialize OpenTelemetry tracer provider, continuing without OpenTelemetry"
        );
    }

    tracing::info!(
        otel_enabled = config.opentelemetry_enabled,
        service_name = %config.service_name,
        environment = %config.deployment_environment,
        json = config.json,
        file = config.file_enabled,
        "Logging initialized"
    );

    Ok(TelemetryGuard {
        _file_guard: file_guard,
    })
}

fn build_resource_attributes(config: &LoggingConfig) -> Resource {
    let service_version = config
        .service_version
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    Resource::new(vec![
        KeyValue::new(semconv::SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(semconv::SERVICE_VERSION, service_version),
        #[allow(deprecated)]
        KeyValue::new(
            opentelemetry_semantic_conventions::attribute::DEPLOYMENT_ENVIRONMENT,
            config.deployment_environment.clone(),
        ),
        KeyValue::new(semconv::TELEMETRY_SDK_NAME, "opentelemetry"),
        KeyValue::new(semconv::TELEMETRY_SDK_LANGUAGE, "rust"),
    ])
}

/// gRPC metadata sent with every OTLP export
fn otlp_metadata(headers: &BTreeMap<String, String>) -> anyhow::Result<MetadataMap> {
    let mut metadata = MetadataMap::with_capacity(headers.len());
    for (name, value) in headers {
        // gRPC metadata keys must be lowercase
        let key = MetadataKey::from_bytes(name.to_ascii_lowercase().as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid OTLP header name '{}': {}", name, e))?;
        let value = MetadataValue::try_from(value.as_str())
            .map_err(|e| anyhow::anyhow!("Invalid OTLP header value for '{}': {}", name, e))?;
        metadata.insert(key, value);
    }
    Ok(metadata)
}

fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        // Follows the upstream sender's decision when the request carries one
        Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(ratio)))
    }
}

fn init_tracer_provider(
    config: &LoggingConfig,
    resource: Resource,
) -> anyhow::Result<TracerProvider> {
    use opentelemetry_sdk::trace::Config;

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(&config.otlp_endpoint)
        .with_timeout(Duration::from_secs(config.otlp_timeout_seconds))
        .with_metadata(otlp_metadata(&config.otlp_headers)?)
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to create OTLP exporter: {}", e))?;

    let trace_config = Config::default()
        .with_sampler(sampler_for(config.trace_sample_ratio))
        .with_resource(resource);

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_config(trace_config)
        .build())
}

/// Directives used when `RUST_LOG` is unset
fn default_directives(level: &str) -> String {
    // The binary and both library crates log at the configured level;
    // outbound HTTP internals stay quiet unless asked for.
    format!(
        "nphies_gateway={level},nphies_extract={level},nphies_models={level},tower_http=debug,reqwest=warn,hyper=warn"
    )
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)))
}

/// Console layer plus, when enabled, a file layer in the same format.
fn output_layers<S>(
    config: &LoggingConfig,
) -> anyhow::Result<(Vec<BoxedLayer<S>>, Option<WorkerGuard>)>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let mut layers: Vec<BoxedLayer<S>> = Vec::with_capacity(2);

    layers.push(if config.json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false) // the current span already carries request_id
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stdout)
            .boxed()
    });

    if !config.file_enabled {
        return Ok((layers, None));
    }

    let (writer, guard) = create_file_appender(config)?;
    layers.push(if config.json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .boxed()
    });

    Ok((layers, Some(guard)))
}

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    /// Unrecognised values roll daily.
    fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "minutely" => LogRotation::Minutely,
            "hourly" => LogRotation::Hourly,
            "never" => LogRotation::Never,
            _ => LogRotation::Daily,
        }
    }

    fn appender(self, config: &LoggingConfig) -> RollingFileAppender {
        let directory = &config.file_directory;
        let prefix = &config.file_prefix;
        match self {
            LogRotation::Minutely => tracing_appender::rolling::minutely(directory, prefix),
            LogRotation::Hourly => tracing_appender::rolling::hourly(directory, prefix),
            LogRotation::Daily => tracing_appender::rolling::daily(directory, prefix),
            // A single file needs an extension of its own
            LogRotation::Never => {
                tracing_appender::rolling::never(directory, format!("{}.log", prefix))
            }
        }
    }
}

fn create_file_appender(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let appender = LogRotation::from_config(&config.file_rotation).appender(config);

    // Writes go through a background thread so request handlers never block on disk
    Ok(tracing_appender::non_blocking(appender))
}

/// Flush pending spans and stop the exporter.
///
/// Also runs when the `TelemetryGuard` drops.
pub fn shutdown_telemetry() {
    tracing::info!("Shutting down OpenTelemetry...");
    global::shutdown_tracer_provider();
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        shutdown_telemetry();
    }
}
