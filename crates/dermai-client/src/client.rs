//! Typed HTTP client for the DermAI backend.

use std::path::Path;
use std::time::Duration;

use dermai_api_models::{
    AnalysisDetailResponse, AnalysisHistoryResponse, AnalysisReport, AnalysisSummary,
    AnalyzeResponse, ApiEnvelope, ChatHealthResponse, ChatHistoryResponse, ChatMessage, ChatReply,
    ChatRequest, ClearChatRequest, ClearChatResponse, DeleteAnalysisRequest,
    DeleteAnalysisResponse, HealthResponse, SystemStatusResponse,
};
use dermai_config::ClientSettings;
use dermai_telemetry::{Metrics, RequestOutcome};
use reqwest::{Client, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, ClientResult, UploadError};
use crate::identity::ClientIdentity;
use crate::operation::Operation;
use crate::upload::ImageUpload;

/// Client for every backend endpoint, bound to one user identity.
#[derive(Clone)]
pub struct DermaiClient {
    http: Client,
    base_url: Url,
    identity: ClientIdentity,
    upload_timeout: Duration,
    max_upload_bytes: u64,
    metrics: Option<Metrics>,
}

impl DermaiClient {
    /// Build a client from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the HTTP client cannot be constructed.
    pub fn new(settings: &ClientSettings, identity: ClientIdentity) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|source| ClientError::Build { source })?;
        let mut base_url = settings.api_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            identity,
            upload_timeout: settings.upload_timeout,
            max_upload_bytes: settings.max_upload_bytes,
            metrics: None,
        })
    }

    /// Record request outcomes in `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Identity sent with user-scoped calls.
    #[must_use]
    pub const fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Upload size limit in bytes.
    #[must_use]
    pub const fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Probe `GET /api/health`.
    ///
    /// The body is decoded whatever the HTTP status, since the backend
    /// reports failures as a 500 carrying a health document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] or [`ClientError::Decode`] when no
    /// health document could be read.
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let operation = Operation::Health;
        let url = self.endpoint("api/health")?;
        let result = self
            .execute::<HealthResponse>(operation, self.http.get(url))
            .await
            .map(|(_, body)| body);
        self.record(operation, &result);
        result
    }

    /// Probe `GET /chat/health`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] when the chat service reports itself
    /// unhealthy, or a transport/decode error.
    pub async fn chat_health(&self) -> ClientResult<ChatHealthResponse> {
        let url = self.endpoint("chat/health")?;
        self.call(Operation::ChatHealth, self.http.get(url)).await
    }

    /// Send a chat message and return the assistant reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] for a blank message, otherwise
    /// the backend's error text or a transport/decode error.
    pub async fn send_chat(&self, message: &str) -> ClientResult<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClientError::InvalidInput {
                field: "message",
                reason: "must not be empty",
            });
        }
        let url = self.endpoint("chat/chat")?;
        let request = self.http.post(url).json(&ChatRequest {
            message: message.to_string(),
            user_id: self.identity.as_str().to_string(),
        });
        self.call(Operation::SendChat, request).await
    }

    /// Fetch the conversation for this identity.
    ///
    /// # Errors
    ///
    /// Returns the backend's error text or a transport/decode error.
    pub async fn chat_history(&self) -> ClientResult<Vec<ChatMessage>> {
        let url = self.endpoint("chat/chat/history")?;
        let request = self.user_scoped(self.http.get(url));
        let body: ChatHistoryResponse = self.call(Operation::ChatHistory, request).await?;
        Ok(body.history)
    }

    /// Delete the conversation for this identity.
    ///
    /// # Errors
    ///
    /// Returns the backend's error text or a transport/decode error.
    pub async fn clear_chat(&self) -> ClientResult<ClearChatResponse> {
        let url = self.endpoint("chat/chat/clear")?;
        let request = self.http.post(url).json(&ClearChatRequest {
            user_id: self.identity.as_str().to_string(),
        });
        self.call(Operation::ClearChat, request).await
    }

    /// Validate an image file and submit it for analysis.
    ///
    /// Type and size are checked before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Upload`] when the file is refused locally,
    /// otherwise as [`Self::analyze_image`].
    pub async fn analyze_path(&self, path: &Path) -> ClientResult<AnalysisReport> {
        let upload = self.prepare_upload(path).await?;
        self.analyze_image(upload).await
    }

    /// Validate an image file against this client's upload limits.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Upload`] when the file is refused.
    pub async fn prepare_upload(&self, path: &Path) -> ClientResult<ImageUpload> {
        ImageUpload::from_path(path, self.max_upload_bytes)
            .await
            .map_err(|err| self.reject_upload(err))
    }

    /// Submit a validated image for analysis.
    ///
    /// The request carries its own upload timeout and is aborted when it
    /// elapses.
    ///
    /// # Errors
    ///
    /// Returns the backend's error text, or a transport/decode error.
    pub async fn analyze_image(&self, upload: ImageUpload) -> ClientResult<AnalysisReport> {
        let operation = Operation::AnalyzeImage;
        let url = self.endpoint("api/analyze")?;
        let (file_name, kind, bytes) = upload.into_parts();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(kind.mime())
            .map_err(|source| ClientError::Build { source })?;
        let form = multipart::Form::new()
            .part("image", part)
            .text("user_id", self.identity.as_str().to_string());
        let request = self
            .http
            .post(url)
            .timeout(self.upload_timeout)
            .multipart(form);

        let body: AnalyzeResponse = self.call(operation, request).await?;
        body.result.ok_or_else(|| missing_result(operation))
    }

    /// Fetch every stored analysis for this identity, newest first.
    ///
    /// # Errors
    ///
    /// Returns the backend's error text or a transport/decode error.
    pub async fn analysis_history(&self) -> ClientResult<Vec<AnalysisSummary>> {
        let url = self.endpoint("api/analysis/history")?;
        let request = self.user_scoped(self.http.get(url));
        let body: AnalysisHistoryResponse = self.call(Operation::AnalysisHistory, request).await?;
        Ok(body.history)
    }

    /// Fetch a single analysis report.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] for a blank id, the backend's
    /// error text (`Analysis not found` on 404), or a transport/decode error.
    pub async fn analysis_detail(&self, analysis_id: &str) -> ClientResult<AnalysisReport> {
        let operation = Operation::AnalysisDetail;
        let analysis_id = require_id(analysis_id)?;
        let mut url = self.endpoint("api/analysis/")?;
        url.path_segments_mut()
            .map_err(|()| invalid_base_url())?
            .pop_if_empty()
            .push(analysis_id);
        let request = self.user_scoped(self.http.get(url));

        let body: AnalysisDetailResponse = self.call(operation, request).await?;
        let mut report = body.result.ok_or_else(|| missing_result(operation))?;
        report.id.get_or_insert_with(|| analysis_id.to_string());
        Ok(report)
    }

    /// Delete a stored analysis.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] for a blank id, the backend's
    /// error text, or a transport/decode error.
    pub async fn delete_analysis(&self, analysis_id: &str) -> ClientResult<DeleteAnalysisResponse> {
        let analysis_id = require_id(analysis_id)?;
        let url = self.endpoint("api/analysis/delete")?;
        let request = self.http.post(url).json(&DeleteAnalysisRequest {
            analysis_id: analysis_id.to_string(),
        });
        self.call(Operation::DeleteAnalysis, request).await
    }

    /// Fetch the per-component status breakdown.
    ///
    /// A `success: false` body still carries the breakdown and is returned
    /// as-is; only a body without one is an error.
    ///
    /// # Errors
    ///
    /// Returns the backend's error text or a transport/decode error.
    pub async fn system_status(&self) -> ClientResult<SystemStatusResponse> {
        let operation = Operation::SystemStatus;
        let url = self.endpoint("api/system/status")?;
        let result = self
            .execute::<SystemStatusResponse>(operation, self.http.get(url))
            .await
            .and_then(|(status, body)| {
                if body.services.is_some() {
                    Ok(body)
                } else {
                    Err(rejection(operation, status, &body))
                }
            });
        self.record(operation, &result);
        result
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url.join(path).map_err(|_| invalid_base_url())
    }

    fn user_scoped(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[("user_id", self.identity.as_str())])
    }

    fn reject_upload(&self, err: UploadError) -> ClientError {
        warn!(reason = err.reason(), error = %err, "image refused before upload");
        if let Some(metrics) = &self.metrics {
            metrics.inc_upload_rejected(err.reason());
        }
        ClientError::Upload(err)
    }

    async fn call<T>(&self, operation: Operation, request: RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned + ApiEnvelope,
    {
        let result = self
            .execute::<T>(operation, request)
            .await
            .and_then(|(status, body)| {
                if body.succeeded() {
                    Ok(body)
                } else {
                    Err(rejection(operation, status, &body))
                }
            });
        self.record(operation, &result);
        result
    }

    async fn execute<T>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> ClientResult<(u16, T)>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|source| transport(operation, source))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| transport(operation, source))?;

        match serde_json::from_slice::<T>(&bytes) {
            Ok(body) => Ok((status.as_u16(), body)),
            Err(_) if !status.is_success() => Err(ClientError::Rejected {
                operation,
                status: status.as_u16(),
                message: operation.failure_message().to_string(),
            }),
            Err(source) => Err(ClientError::Decode {
                operation,
                status: status.as_u16(),
                source,
            }),
        }
    }

    fn record<T>(&self, operation: Operation, result: &ClientResult<T>) {
        let outcome = match result {
            Ok(_) => RequestOutcome::Success,
            Err(ClientError::Rejected { .. }) => RequestOutcome::Rejected,
            Err(_) => RequestOutcome::TransportError,
        };
        match result {
            Ok(_) => debug!(operation = %operation, "backend call succeeded"),
            Err(err) => warn!(operation = %operation, error = %err, "backend call failed"),
        }
        if let Some(metrics) = &self.metrics {
            metrics.inc_api_request(operation.as_str(), outcome);
        }
    }
}

fn transport(operation: Operation, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        operation,
        url: source.url().map(ToString::to_string).unwrap_or_default(),
        source,
    }
}

fn rejection<T: ApiEnvelope>(operation: Operation, status: u16, body: &T) -> ClientError {
    let message = body
        .error_message()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| operation.failure_message())
        .to_string();
    ClientError::Rejected {
        operation,
        status,
        message,
    }
}

fn missing_result(operation: Operation) -> ClientError {
    ClientError::Rejected {
        operation,
        status: 200,
        message: operation.failure_message().to_string(),
    }
}

fn require_id(analysis_id: &str) -> ClientResult<&str> {
    let trimmed = analysis_id.trim();
    if trimmed.is_empty() {
        Err(ClientError::InvalidInput {
            field: "analysis_id",
            reason: "must not be empty",
        })
    } else {
        Ok(trimmed)
    }
}

const fn invalid_base_url() -> ClientError {
    ClientError::InvalidInput {
        field: "api_url",
        reason: "cannot be used as a base URL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use dermai_config::{SettingsOverrides, load_settings};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn client_for(server: &MockServer) -> Result<DermaiClient> {
        let settings = load_settings(
            None,
            &SettingsOverrides {
                api_url: Some(server.base_url()),
                ..SettingsOverrides::default()
            },
        )?;
        Ok(DermaiClient::new(&settings, ClientIdentity::new("user-1")?)?)
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_preserved() -> Result<()> {
        let server = MockServer::start_async().await;
        let prefixed = server.mock(|when, then| {
            when.method(GET).path("/dermai/api/health");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"status": "healthy", "model_loaded": true}));
        });
        let bare = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200);
        });
        let mut settings = load_settings(
            None,
            &SettingsOverrides {
                api_url: Some(format!("{}/dermai", server.base_url())),
                ..SettingsOverrides::default()
            },
        )?;
        let client = DermaiClient::new(&settings, ClientIdentity::new("user-1")?)?;
        assert!(client.health().await?.model_loaded);

        settings.api_url = Url::parse(&format!("{}/dermai", server.base_url()))?;
        let unnormalised = DermaiClient::new(&settings, ClientIdentity::new("user-1")?)?;
        assert_eq!(unnormalised.base_url().path(), "/dermai/");
        assert!(unnormalised.health().await?.model_loaded);

        prefixed.assert_calls(2);
        bare.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn health_reads_flags_even_from_error_status() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(500)
                .header("content-type", "application/json")
                .json_body(json!({"status": "unhealthy", "error": "db down"}));
        });

        let health = client_for(&server)?.health().await?;
        assert!(!health.model_loaded);
        assert_eq!(health.error.as_deref(), Some("db down"));
        Ok(())
    }

    #[tokio::test]
    async fn chat_send_posts_identity_and_returns_reply() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/chat")
                .json_body(json!({"message": "Is this ringworm?", "user_id": "user-1"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "response": "It may be. Please see a dermatologist.",
                    "timestamp": "2024-03-01T10:00:00"
                }));
        });

        let reply = client_for(&server)?
            .send_chat("  Is this ringworm?  ")
            .await?;
        mock.assert();
        assert_eq!(
            reply.response.as_deref(),
            Some("It may be. Please see a dermatologist.")
        );
        Ok(())
    }

    #[tokio::test]
    async fn blank_chat_message_is_refused_locally() -> Result<()> {
        let server = MockServer::start_async().await;
        let client = client_for(&server)?;
        assert!(matches!(
            client.send_chat("   ").await,
            Err(ClientError::InvalidInput {
                field: "message",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn backend_error_text_is_surfaced() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/analysis/history")
                .query_param("user_id", "user-1");
            then.status(500)
                .header("content-type", "application/json")
                .json_body(json!({"success": false, "error": "database is locked"}));
        });

        let err = client_for(&server)?
            .analysis_history()
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(err.to_string(), "database is locked");
        Ok(())
    }

    #[tokio::test]
    async fn missing_error_text_falls_back_to_operation_message() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/abc-1");
            then.status(502).body("Bad Gateway");
        });

        let err = client_for(&server)?
            .analysis_detail("abc-1")
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert_eq!(err.to_string(), "Failed to fetch analysis details");
        Ok(())
    }

    #[tokio::test]
    async fn analysis_detail_keeps_requested_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/analysis/abc-1")
                .query_param("user_id", "user-1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "result": {
                        "report_metadata": {"timestamp": "2024-03-01T10:00:00"},
                        "primary_analysis": {"condition": "Shingles", "confidence": 93.5},
                        "detailed_analysis": {"overview": ["Viral reactivation"]}
                    }
                }));
        });

        let report = client_for(&server)?.analysis_detail(" abc-1 ").await?;
        mock.assert();
        assert_eq!(report.id.as_deref(), Some("abc-1"));
        assert_eq!(report.primary_analysis.condition, "Shingles");
        Ok(())
    }

    #[tokio::test]
    async fn not_found_detail_is_reported_as_such() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/analysis/nope");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({"success": false, "error": "Analysis not found"}));
        });

        let err = client_for(&server)?
            .analysis_detail("nope")
            .await
            .err()
            .ok_or_else(|| anyhow!("expected failure"))?;
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Analysis not found");
        Ok(())
    }

    #[tokio::test]
    async fn oversized_upload_never_reaches_the_network() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/analyze");
            then.status(200);
        });
        let dir = TempDir::new()?;
        let path = dir.path().join("scan.jpg");
        std::fs::File::create(&path)?.set_len(12 * 1024 * 1024)?;

        let metrics = Metrics::new()?;
        let client = client_for(&server)?.with_metrics(metrics.clone());
        let err = client.analyze_path(&path).await.err();

        assert!(matches!(
            err,
            Some(ClientError::Upload(UploadError::TooLarge { .. }))
        ));
        mock.assert_calls(0);
        assert!(
            metrics
                .render()?
                .contains("uploads_rejected_total{reason=\"too_large\"} 1")
        );
        Ok(())
    }

    #[tokio::test]
    async fn analyze_uploads_multipart_and_returns_report() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/analyze");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "result": {
                        "id": "new-7",
                        "primary_analysis": {"condition": "Nail Fungus", "confidence": 88.1},
                        "differential_diagnoses": [
                            {"condition": "Athletes Foot", "confidence": 7.2}
                        ]
                    }
                }));
        });
        let dir = TempDir::new()?;
        let path = dir.path().join("toe.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G'])?;

        let report = client_for(&server)?.analyze_path(&path).await?;
        mock.assert();
        assert_eq!(report.id.as_deref(), Some("new-7"));
        assert_eq!(report.differential_diagnoses.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn system_status_returns_breakdown_when_degraded() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/system/status");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": false,
                    "services": {
                        "chat_service": {"status": "error", "message": "Missing GROQ API key"},
                        "analysis_service": {"status": "healthy", "message": null},
                        "database": {"status": "healthy", "message": "Database connection verified"}
                    }
                }));
        });

        let status = client_for(&server)?.system_status().await?;
        let services = status
            .services
            .ok_or_else(|| anyhow!("services missing"))?;
        assert!(!services.chat_service.is_healthy());
        assert!(services.database.is_healthy());
        Ok(())
    }

    #[tokio::test]
    async fn delete_and_clear_post_identifiers() -> Result<()> {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(POST)
                .path("/api/analysis/delete")
                .json_body(json!({"analysis_id": "abc-1"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"success": true, "message": "Analysis deleted successfully"}));
        });
        let clear = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/chat/clear")
                .json_body(json!({"user_id": "user-1"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"success": true, "message": "Chat history cleared"}));
        });

        let client = client_for(&server)?;
        let deleted = client.delete_analysis("abc-1").await?;
        let cleared = client.clear_chat().await?;
        delete.assert();
        clear.assert();
        assert_eq!(
            deleted.message.as_deref(),
            Some("Analysis deleted successfully")
        );
        assert!(cleared.success);
        Ok(())
    }

    #[tokio::test]
    async fn transport_failure_is_classified() -> Result<()> {
        let settings = load_settings(
            None,
            &SettingsOverrides {
                api_url: Some("http://127.0.0.1:9".to_string()),
                ..SettingsOverrides::default()
            },
        )?;
        let client = DermaiClient::new(&settings, ClientIdentity::generate())?;
        assert!(matches!(
            client.chat_history().await,
            Err(ClientError::Transport {
                operation: Operation::ChatHistory,
                ..
            })
        ));
        Ok(())
    }
}
