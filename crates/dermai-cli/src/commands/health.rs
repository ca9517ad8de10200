use std::sync::Arc;

use anyhow::anyhow;
use dermai_client::{HealthMonitor, ServiceStatus};
use tracing::info;

use crate::cli::{HealthArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_service_status, render_system_status};

pub(crate) async fn handle_health(
    ctx: &AppContext,
    args: HealthArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let monitor = HealthMonitor::new(
        Arc::new(ctx.client.clone()),
        ctx.settings.health_poll_interval,
    )
    .with_metrics(ctx.metrics.clone());

    if !args.watch {
        let status = monitor.poll_once().await;
        return render_service_status(&status, format);
    }

    let handle = monitor.spawn();
    let mut updates = handle.subscribe();
    let mut printed: Option<ServiceStatus> = None;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *updates.borrow_and_update();
                if printed != Some(status) {
                    render_service_status(&status, format)?;
                    printed = Some(status);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping health watch");
                break;
            }
        }
    }
    drop(handle);

    if args.metrics {
        let rendered = ctx
            .metrics
            .render()
            .map_err(|err| CliError::failure(anyhow!("failed to render metrics: {err}")))?;
        print!("{rendered}");
    }
    Ok(())
}

pub(crate) async fn handle_status(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let response = ctx.client.system_status().await?;
    render_system_status(&response, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context_for;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn health_check_polls_once_and_records_metrics() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "healthy",
                    "model_loaded": true,
                    "database_connected": true,
                    "upload_folder": true
                }));
        });
        let ctx = context_for(&server)?;

        handle_health(&ctx, HealthArgs::default(), OutputFormat::Json)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.health_polls_ok, 1);
        assert!(snapshot.service_healthy);
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_reports_unavailable_without_failing() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(503).body("upstream down");
        });
        let ctx = context_for(&server)?;

        handle_health(&ctx, HealthArgs::default(), OutputFormat::Table)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.health_polls_failed, 1);
        assert!(!snapshot.service_healthy);
        Ok(())
    }

    #[tokio::test]
    async fn system_status_server_error_is_a_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/system/status");
            then.status(500)
                .header("content-type", "application/json")
                .json_body(json!({"success": false, "error": "status probe crashed"}));
        });
        let ctx = context_for(&server)?;

        let err = handle_status(&ctx, OutputFormat::Table)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.display_message(), "status probe crashed");
        Ok(())
    }
}
