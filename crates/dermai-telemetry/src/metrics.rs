//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Tracks the client-side view of the backend: request outcomes, health
//!   polls, chat reconnects and rejected uploads.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// How an API call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The backend answered with `success: true` (or a usable body).
    Success,
    /// The backend answered but reported failure.
    Rejected,
    /// The request never produced a usable response.
    TransportError,
}

impl RequestOutcome {
    /// Label value recorded on counters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::TransportError => "transport_error",
        }
    }
}

/// Prometheus-backed metrics registry shared across the client.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    api_requests_total: IntCounterVec,
    health_polls_total: IntCounterVec,
    service_healthy: IntGauge,
    chat_reconnect_attempts_total: IntCounter,
    uploads_rejected_total: IntCounterVec,
}

/// Snapshot of selected gauges and counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Whether the last health poll reported a healthy backend.
    pub service_healthy: bool,
    /// Health polls that returned a usable body.
    pub health_polls_ok: u64,
    /// Health polls that failed closed.
    pub health_polls_failed: u64,
    /// Scheduled chat connectivity retries that have run.
    pub chat_reconnect_attempts_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let api_requests_total = counter_vec(
            "api_requests_total",
            "Backend API calls by operation and outcome",
            &["operation", "outcome"],
        )?;
        let health_polls_total = counter_vec(
            "health_polls_total",
            "Health endpoint polls by outcome",
            &["outcome"],
        )?;
        let service_healthy = IntGauge::with_opts(Opts::new(
            "service_healthy",
            "1 when the last health poll reported every component ready",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "service_healthy",
            source,
        })?;
        let chat_reconnect_attempts_total = IntCounter::with_opts(Opts::new(
            "chat_reconnect_attempts_total",
            "Scheduled chat connectivity retries",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "chat_reconnect_attempts_total",
            source,
        })?;
        let uploads_rejected_total = counter_vec(
            "uploads_rejected_total",
            "Image uploads refused before any network call",
            &["reason"],
        )?;

        register(&registry, "api_requests_total", &api_requests_total)?;
        register(&registry, "health_polls_total", &health_polls_total)?;
        register(&registry, "service_healthy", &service_healthy)?;
        register(
            &registry,
            "chat_reconnect_attempts_total",
            &chat_reconnect_attempts_total,
        )?;
        register(&registry, "uploads_rejected_total", &uploads_rejected_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                api_requests_total,
                health_polls_total,
                service_healthy,
                chat_reconnect_attempts_total,
                uploads_rejected_total,
            }),
        })
    }

    /// Count one API call.
    pub fn inc_api_request(&self, operation: &str, outcome: RequestOutcome) {
        self.inner
            .api_requests_total
            .with_label_values(&[operation, outcome.as_str()])
            .inc();
    }

    /// Record a health poll and the resulting aggregate.
    pub fn observe_health_poll(&self, succeeded: bool, healthy: bool) {
        let outcome = if succeeded { "ok" } else { "failed" };
        self.inner
            .health_polls_total
            .with_label_values(&[outcome])
            .inc();
        self.inner.service_healthy.set(i64::from(healthy));
    }

    /// Count a chat connectivity retry.
    pub fn inc_chat_reconnect(&self) {
        self.inner.chat_reconnect_attempts_total.inc();
    }

    /// Count an upload refused locally.
    pub fn inc_upload_rejected(&self, reason: &str) {
        self.inner
            .uploads_rejected_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the health-related collectors.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let polls = &self.inner.health_polls_total;
        MetricsSnapshot {
            service_healthy: self.inner.service_healthy.get() == 1,
            health_polls_ok: polls.with_label_values(&["ok"]).get(),
            health_polls_failed: polls.with_label_values(&["failed"]).get(),
            chat_reconnect_attempts_total: self.inner.chat_reconnect_attempts_total.get(),
        }
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::MetricsCollector { name, source })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
