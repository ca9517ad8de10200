//! Backend health aggregation.
//!
//! A background task polls the health endpoint once at startup and then on a
//! fixed interval. Every poll replaces the published [`ServiceStatus`]
//! wholesale; a failed poll publishes the all-false status.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dermai_api_models::HealthResponse;
use dermai_telemetry::Metrics;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::DermaiClient;
use crate::error::ClientResult;

/// Source of health documents.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
    /// Fetch one health document.
    async fn probe_health(&self) -> ClientResult<HealthResponse>;
}

#[async_trait]
impl HealthProbe for DermaiClient {
    async fn probe_health(&self) -> ClientResult<HealthResponse> {
        self.health().await
    }
}

/// Readiness flags reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    /// Classifier weights are loaded.
    pub model_loaded: bool,
    /// Database is reachable.
    pub database_connected: bool,
    /// Upload directory exists.
    pub upload_folder_ready: bool,
}

impl ServiceStatus {
    /// Status before the first poll and after any failed poll.
    pub const UNAVAILABLE: Self = Self {
        model_loaded: false,
        database_connected: false,
        upload_folder_ready: false,
    };

    /// Flags from a health document.
    #[must_use]
    pub const fn from_response(response: &HealthResponse) -> Self {
        Self {
            model_loaded: response.model_loaded,
            database_connected: response.database_connected,
            upload_folder_ready: response.upload_folder,
        }
    }

    /// Every component is ready.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.model_loaded && self.database_connected && self.upload_folder_ready
    }
}

/// Polls a [`HealthProbe`] and publishes the latest [`ServiceStatus`].
pub struct HealthMonitor<P> {
    probe: Arc<P>,
    interval: Duration,
    metrics: Option<Metrics>,
}

impl<P: HealthProbe> HealthMonitor<P> {
    /// Monitor polling `probe` every `interval`.
    #[must_use]
    pub const fn new(probe: Arc<P>, interval: Duration) -> Self {
        Self {
            probe,
            interval,
            metrics: None,
        }
    }

    /// Record polls in `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Run a single poll.
    pub async fn poll_once(&self) -> ServiceStatus {
        let (status, succeeded) = match self.probe.probe_health().await {
            Ok(response) => (ServiceStatus::from_response(&response), true),
            Err(err) => {
                warn!(error = %err, "health poll failed; marking services unavailable");
                (ServiceStatus::UNAVAILABLE, false)
            }
        };
        debug!(?status, healthy = status.is_healthy(), "health poll completed");
        if let Some(metrics) = &self.metrics {
            metrics.observe_health_poll(succeeded, status.is_healthy());
        }
        status
    }

    /// Start polling in the background.
    ///
    /// The first poll runs immediately. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn spawn(self) -> HealthMonitorHandle {
        let (sender, receiver) = watch::channel(ServiceStatus::UNAVAILABLE);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut previous = None;
            loop {
                ticker.tick().await;
                let status = self.poll_once().await;
                if previous.is_some_and(|last: ServiceStatus| last.is_healthy() != status.is_healthy())
                {
                    info!(healthy = status.is_healthy(), "backend health changed");
                }
                previous = Some(status);
                sender.send_replace(status);
            }
        });
        HealthMonitorHandle { receiver, task }
    }
}

/// Handle to a running [`HealthMonitor`]. Dropping it stops polling.
pub struct HealthMonitorHandle {
    receiver: watch::Receiver<ServiceStatus>,
    task: JoinHandle<()>,
}

impl HealthMonitorHandle {
    /// Latest published status.
    #[must_use]
    pub fn current(&self) -> ServiceStatus {
        *self.receiver.borrow()
    }

    /// Aggregate health of the latest status.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.current().is_healthy()
    }

    /// Receiver notified after every poll.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ServiceStatus> {
        self.receiver.clone()
    }
}

impl Drop for HealthMonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
