//! OpenTelemetry metrics export for the content service.
//!
//! With the `metrics` feature, [`init_observability`] installs a global meter
//! provider so that pipeline counters reach an exporter. Without it the call
//! only logs and returns an inert guard.

#[cfg(feature = "metrics")]
use opentelemetry::{KeyValue, global};
#[cfg(feature = "metrics")]
use opentelemetry_otlp::{MetricExporter as OtlpExporter, WithExportConfig};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
};
#[cfg(feature = "metrics")]
use opentelemetry_stdout::MetricExporter as StdoutExporter;
#[cfg(feature = "metrics")]
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Where metrics are exported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MetricsExporter {
    /// Print periodic snapshots to stdout
    #[default]
    Stdout,
    /// Push to an OTLP/HTTP collector at the given endpoint
    Otlp(String),
}

impl MetricsExporter {
    /// Reads `OTEL_EXPORTER` (`otlp` or `stdout`) and
    /// `OTEL_EXPORTER_OTLP_ENDPOINT` (default `http://localhost:4318`).
    pub fn from_env() -> Self {
        match std::env::var("OTEL_EXPORTER").as_deref() {
            Ok("otlp") => MetricsExporter::Otlp(
                std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:4318".to_string()),
            ),
            _ => MetricsExporter::Stdout,
        }
    }
}

/// Keeps the meter provider alive; flushes and shuts it down on drop.
#[derive(Debug, Default)]
pub struct ObservabilityGuard {
    #[cfg(feature = "metrics")]
    provider: Option<SdkMeterProvider>,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        #[cfg(feature = "metrics")]
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Meter provider shutdown failed");
            }
        }
        debug!("Observability shut down");
    }
}

/// Initialize metrics export for `service_name`.
///
/// Returns a guard that must be held for the lifetime of the process.
#[instrument(skip(exporter))]
pub fn init_observability(
    service_name: &'static str,
    exporter: MetricsExporter,
    export_interval_secs: u64,
) -> Result<ObservabilityGuard, String> {
    #[cfg(not(feature = "metrics"))]
    {
        let _ = (exporter, export_interval_secs);
        info!(
            service_name,
            "Metrics feature disabled - skipping metrics initialization"
        );
        Ok(ObservabilityGuard::default())
    }

    #[cfg(feature = "metrics")]
    {
        let resource = Resource::builder_empty()
            .with_attributes([KeyValue::new("service.name", service_name)])
            .build();
        let interval = Duration::from_secs(export_interval_secs);

        let provider = match &exporter {
            MetricsExporter::Otlp(endpoint) => {
                info!(endpoint = %endpoint, "Using OTLP metrics exporter");
                let otlp = OtlpExporter::builder()
                    .with_http()
                    .with_endpoint(endpoint)
                    .with_timeout(Duration::from_secs(10))
                    .build()
                    .map_err(|e| format!("Failed to create OTLP exporter: {}", e))?;
                let reader = PeriodicReader::builder(otlp).with_interval(interval).build();
                SdkMeterProvider::builder()
                    .with_resource(resource)
                    .with_reader(reader)
                    .build()
            }
            MetricsExporter::Stdout => {
                info!("Using stdout metrics exporter");
                let reader = PeriodicReader::builder(StdoutExporter::default())
                    .with_interval(interval)
                    .build();
                SdkMeterProvider::builder()
                    .with_resource(resource)
                    .with_reader(reader)
                    .build()
            }
        };

        global::set_meter_provider(provider.clone());
        info!(service_name, export_interval_secs, "Metrics initialized");

        Ok(ObservabilityGuard {
            provider: Some(provider),
        })
    }
}
