//! Chat service connectivity tracking.
//!
//! Connectivity is checked once at startup. A failed check schedules exactly
//! one retry after the configured delay; a failed retry schedules the next
//! one. At most one retry is ever pending, and once a check succeeds the task
//! finishes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dermai_telemetry::Metrics;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::DermaiClient;
use crate::error::ClientResult;

/// Source of chat connectivity checks.
#[async_trait]
pub trait ChatProbe: Send + Sync + 'static {
    /// Succeeds when the chat service reports itself healthy.
    async fn probe_chat(&self) -> ClientResult<()>;
}

#[async_trait]
impl ChatProbe for DermaiClient {
    async fn probe_chat(&self) -> ClientResult<()> {
        self.chat_health().await.map(|_| ())
    }
}

/// Latest chat connectivity state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatLink {
    /// Last check succeeded.
    pub connected: bool,
    /// Checks run so far, including the startup check.
    pub attempts: u32,
}

/// Checks chat connectivity with a single pending retry.
pub struct ChatConnectivity<P> {
    probe: Arc<P>,
    retry_delay: Duration,
    metrics: Option<Metrics>,
}

impl<P: ChatProbe> ChatConnectivity<P> {
    /// Tracker retrying `retry_delay` after each failure.
    #[must_use]
    pub const fn new(probe: Arc<P>, retry_delay: Duration) -> Self {
        Self {
            probe,
            retry_delay,
            metrics: None,
        }
    }

    /// Count retries in `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Start checking in the background. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn spawn(self) -> ChatConnectivityHandle {
        let (sender, receiver) = watch::channel(ChatLink::default());
        let task = tokio::spawn(async move {
            let mut attempts = 0_u32;
            loop {
                if let Some(metrics) = self.metrics.as_ref().filter(|_| attempts > 0) {
                    metrics.inc_chat_reconnect();
                }
                attempts = attempts.saturating_add(1);
                match self.probe.probe_chat().await {
                    Ok(()) => {
                        info!(attempts, "chat service connected");
                        sender.send_replace(ChatLink {
                            connected: true,
                            attempts,
                        });
                        break;
                    }
                    Err(err) => {
                        warn!(
                            error = %err,
                            retry_in_secs = self.retry_delay.as_secs(),
                            "chat service unavailable; retry scheduled"
                        );
                        sender.send_replace(ChatLink {
                            connected: false,
                            attempts,
                        });
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        });
        ChatConnectivityHandle { receiver, task }
    }
}

/// Handle to a running [`ChatConnectivity`] task. Dropping it cancels any
/// pending retry.
pub struct ChatConnectivityHandle {
    receiver: watch::Receiver<ChatLink>,
    task: JoinHandle<()>,
}

impl ChatConnectivityHandle {
    /// Latest state.
    #[must_use]
    pub fn current(&self) -> ChatLink {
        *self.receiver.borrow()
    }

    /// Receiver notified after every check.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChatLink> {
        self.receiver.clone()
    }

    /// Wait until connected or until `max_attempts` checks have failed.
    pub async fn settle(&self, max_attempts: u32) -> ChatLink {
        let mut receiver = self.receiver.clone();
        let settled = receiver
            .wait_for(|link| link.connected || link.attempts >= max_attempts)
            .await
            .map(|link| *link);
        settled.unwrap_or_else(|_| self.current())
    }
}

impl Drop for ChatConnectivityHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
