use std::sync::Arc;

use anyhow::Context;
use dermai_api_models::AnalysisSummary;
use dermai_client::HealthMonitor;
use dermai_conditions::ReviewSummary;
use tracing::{info, warn};

use crate::cli::{AnalyzeArgs, DeleteArgs, HistoryArgs, OutputFormat, ReportArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_dashboard, render_report};

const SERVICE_UNAVAILABLE: &str = "Service is currently unavailable. Please try again later.";

pub(crate) async fn handle_analyze(
    ctx: &AppContext,
    args: &AnalyzeArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let upload = ctx.client.prepare_upload(&args.path).await?;

    let status = HealthMonitor::new(
        Arc::new(ctx.client.clone()),
        ctx.settings.health_poll_interval,
    )
    .with_metrics(ctx.metrics.clone())
    .poll_once()
    .await;
    if !status.is_healthy() {
        warn!(?status, "refusing upload while backend is unhealthy");
        return Err(CliError::failure(anyhow::anyhow!(SERVICE_UNAVAILABLE)));
    }

    let report = ctx.client.analyze_image(upload).await?;
    if let Some(id) = &report.id {
        info!(analysis_id = %id, "analysis stored");
    }
    render_report(&report, format)
}

pub(crate) async fn handle_history(
    ctx: &AppContext,
    args: &HistoryArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let history = ctx.client.analysis_history().await?;
    let (summary, rows) = select_history(&history, args);
    render_dashboard(&summary, &rows, format)
}

/// Counters cover the whole history; the rows honour search and filter.
fn select_history<'a>(
    history: &'a [AnalysisSummary],
    args: &HistoryArgs,
) -> (ReviewSummary, Vec<&'a AnalysisSummary>) {
    let summary = ReviewSummary::from_confidences(history.iter().map(|row| row.confidence));
    let search = args.search.as_deref().unwrap_or_default().trim();
    let rows = history
        .iter()
        .filter(|row| row.matches_search(search) && args.filter.admits(row.listing_tier()))
        .collect();
    (summary, rows)
}

pub(crate) async fn handle_report(
    ctx: &AppContext,
    args: ReportArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let report = ctx.client.analysis_detail(&args.id).await?;
    render_report(&report, format)?;

    if let Some(path) = args.save_preview {
        let bytes = report
            .decode_image_preview()
            .ok_or_else(|| CliError::validation("analysis has no image preview"))?
            .context("image preview is not valid base64")
            .map_err(CliError::failure)?;
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
            .map_err(CliError::failure)?;
        eprintln!("preview written to {}", path.display());
    }
    Ok(())
}

pub(crate) async fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> CliResult<()> {
    let response = ctx.client.delete_analysis(&args.id).await?;
    println!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("Analysis deleted successfully")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StatusFilter;
    use crate::commands::test_support::{TEST_USER, context_for};
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn healthy_backend(server: &MockServer) {
        server.mock(|when, then| {
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
    }

    #[tokio::test]
    async fn analyze_uploads_after_health_check() -> Result<()> {
        let server = MockServer::start_async().await;
        healthy_backend(&server);
        let analyze = server.mock(|when, then| {
            when.method(POST).path("/api/analyze");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "result": {
                        "id": "scan-1",
                        "primary_analysis": {"condition": "Ringworm", "confidence": 91.0}
                    }
                }));
        });
        let dir = TempDir::new()?;
        let path = dir.path().join("arm.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF])?;
        let ctx = context_for(&server)?;

        handle_analyze(&ctx, &AnalyzeArgs { path }, OutputFormat::Table)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        analyze.assert();
        Ok(())
    }

    #[tokio::test]
    async fn analyze_is_refused_while_backend_is_unhealthy() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(500)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "unhealthy",
                    "model_loaded": false,
                    "database_connected": true,
                    "upload_folder": true
                }));
        });
        let analyze = server.mock(|when, then| {
            when.method(POST).path("/api/analyze");
            then.status(200);
        });
        let dir = TempDir::new()?;
        let path = dir.path().join("arm.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G'])?;
        let ctx = context_for(&server)?;

        let err = handle_analyze(&ctx, &AnalyzeArgs { path }, OutputFormat::Table)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(err.display_message(), SERVICE_UNAVAILABLE);
        analyze.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_file_is_rejected_before_any_request() -> Result<()> {
        let server = MockServer::start_async().await;
        let health = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200);
        });
        let dir = TempDir::new()?;
        let path = dir.path().join("notes.gif");
        std::fs::write(&path, b"GIF89a")?;
        let ctx = context_for(&server)?;

        let err = handle_analyze(&ctx, &AnalyzeArgs { path }, OutputFormat::Table)
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.display_message(),
            "Please upload a valid image file (JPEG or PNG)"
        );
        health.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn history_filters_rows_for_the_user() -> Result<()> {
        let server = MockServer::start_async().await;
        let history = server.mock(|when, then| {
            when.method(GET)
                .path("/api/analysis/history")
                .query_param("user_id", TEST_USER);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "history": [
                        {"id": "a1", "timestamp": "2024-05-01T10:00:00", "primary_condition": "Ringworm", "confidence": 92.0},
                        {"id": "a2", "timestamp": "2024-05-02T10:00:00", "primary_condition": "Shingles", "confidence": 40.0}
                    ]
                }));
        });
        let ctx = context_for(&server)?;

        handle_history(
            &ctx,
            &HistoryArgs {
                search: Some("shin".to_string()),
                filter: StatusFilter::Pending,
            },
            OutputFormat::Json,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        history.assert();
        Ok(())
    }

    fn sample_history() -> Vec<AnalysisSummary> {
        vec![
            AnalysisSummary {
                id: "a1".to_string(),
                timestamp: "2024-05-01T10:00:00".to_string(),
                primary_condition: "Ringworm".to_string(),
                confidence: 0.92,
                ..AnalysisSummary::default()
            },
            AnalysisSummary {
                id: "a2".to_string(),
                timestamp: "2024-05-02T10:00:00".to_string(),
                primary_condition: "Shingles".to_string(),
                confidence: 0.4,
                ..AnalysisSummary::default()
            },
            AnalysisSummary {
                id: "b3-shin".to_string(),
                timestamp: "2024-05-03T10:00:00".to_string(),
                primary_condition: "Chickenpox".to_string(),
                confidence: 97.0,
                ..AnalysisSummary::default()
            },
        ]
    }

    fn ids(rows: &[&AnalysisSummary]) -> Vec<String> {
        rows.iter().map(|row| row.id.clone()).collect()
    }

    #[test]
    fn search_and_filter_narrow_rows_but_not_counters() {
        let history = sample_history();
        let args = HistoryArgs {
            search: Some(" SHIN ".to_string()),
            filter: StatusFilter::Pending,
        };
        let (summary, rows) = select_history(&history, &args);
        assert_eq!(ids(&rows), vec!["a2"]);
        assert_eq!(
            summary,
            ReviewSummary {
                total_scans: 3,
                pending_review: 1,
                urgent_cases: 1,
                reviewed: 2,
            }
        );

        let urgent = HistoryArgs {
            search: Some("shingles".to_string()),
            filter: StatusFilter::Urgent,
        };
        let (urgent_summary, urgent_rows) = select_history(&history, &urgent);
        assert!(urgent_rows.is_empty());
        assert_eq!(urgent_summary, summary);
    }

    #[test]
    fn search_matches_identifier_and_default_args_keep_everything() {
        let history = sample_history();
        let by_id = HistoryArgs {
            search: Some("shin".to_string()),
            filter: StatusFilter::Urgent,
        };
        assert_eq!(ids(&select_history(&history, &by_id).1), vec!["b3-shin"]);

        let (_, all) = select_history(&history, &HistoryArgs::default());
        assert_eq!(ids(&all), vec!["a1", "a2", "b3-shin"]);
    }

    #[tokio::test]
    async fn report_saves_decoded_preview() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/scan-9");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "result": {
                        "primary_analysis": {"condition": "Nail Fungus", "confidence": 77.0},
                        "image_preview": "aGVsbG8="
                    }
                }));
        });
        let dir = TempDir::new()?;
        let target = dir.path().join("preview.jpg");
        let ctx = context_for(&server)?;

        handle_report(
            &ctx,
            ReportArgs {
                id: "scan-9".to_string(),
                save_preview: Some(target.clone()),
            },
            OutputFormat::Table,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(std::fs::read(&target)?, b"hello");
        Ok(())
    }

    #[tokio::test]
    async fn report_without_preview_cannot_be_saved() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/scan-3");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "result": {"primary_analysis": {"condition": "Acne", "confidence": 64.0}}
                }));
        });
        let dir = TempDir::new()?;
        let ctx = context_for(&server)?;

        let err = handle_report(
            &ctx,
            ReportArgs {
                id: "scan-3".to_string(),
                save_preview: Some(dir.path().join("none.jpg")),
            },
            OutputFormat::Json,
        )
        .await
        .err()
        .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(err.exit_code(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn delete_posts_identifier() -> Result<()> {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(POST)
                .path("/api/analysis/delete")
                .json_body(json!({"analysis_id": "a1"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"success": true, "message": "Analysis deleted successfully"}));
        });
        let ctx = context_for(&server)?;

        handle_delete(&ctx, &DeleteArgs { id: "a1".to_string() })
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        delete.assert();
        Ok(())
    }
}
