//! Tracing and OpenTelemetry initialization.
//!
//! Without the `telemetry` feature only plain `tracing` events are emitted and
//! the host application installs its own subscriber.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::CacheableResult;
use serde::{Deserialize, Serialize};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,cacheable=debug,tower_http=debug";

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether OpenTelemetry export is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Log output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_service_name() -> String {
    "cacheable".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
            log_format: default_log_format(),
        }
    }
}

impl TelemetryConfig {
    /// Returns true when log lines should be emitted as JSON.
    #[must_use]
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Initialize tracing, with an OpenTelemetry layer when enabled.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> CacheableResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if !config.enabled {
        let registry = tracing_subscriber::registry().with(filter);
        if config.json_logs() {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_target(true))
                .init();
        }
        return Ok(());
    }

    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(
        SERVICE_NAME,
        config.service_name.clone(),
    )]);

    let tracer_provider = if let Some(endpoint) = &config.otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| {
                crate::CacheableError::internal(format!("Failed to create OTLP exporter: {}", e))
            })?;

        opentelemetry_sdk::trace::TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_sampler(sampler)
            .with_id_generator(RandomIdGenerator::default())
            .with_resource(resource)
            .build()
    } else {
        opentelemetry_sdk::trace::TracerProvider::builder()
            .with_sampler(sampler)
            .with_id_generator(RandomIdGenerator::default())
            .with_resource(resource)
            .build()
    };

    let tracer = tracer_provider.tracer("cacheable");
    opentelemetry::global::set_tracer_provider(tracer_provider);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .init();

    tracing::info!(
        service_name = %config.service_name,
        sampling_ratio = %config.sampling_ratio,
        otlp_endpoint = ?config.otlp_endpoint,
        "Telemetry initialized"
    );

    Ok(())
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(_config: &TelemetryConfig) -> CacheableResult<()> {
    Ok(())
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}
