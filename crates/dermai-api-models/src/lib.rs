#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the DermAI backend API.
//!
//! Every response body carries a `success` flag and, on failure, an `error`
//! string; [`ApiEnvelope`] exposes both uniformly so the client can surface
//! backend messages verbatim. Fields the backend may omit are defaulted rather
//! than rejected.
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use dermai_conditions::{
    ConfidenceBand, ReportSection, ResolvedCondition, SectionKind, SeverityPolicy, SeverityTier,
    resolve,
};

/// Uniform view over the `success`/`error` fields of every response body.
pub trait ApiEnvelope {
    /// Whether the backend reported success.
    fn succeeded(&self) -> bool;
    /// Backend-supplied error text, if any.
    fn error_message(&self) -> Option<&str>;
}

macro_rules! impl_envelope {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ApiEnvelope for $ty {
                fn succeeded(&self) -> bool {
                    self.success
                }

                fn error_message(&self) -> Option<&str> {
                    self.error.as_deref()
                }
            }
        )+
    };
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// `healthy` when model and database are both up.
    #[serde(default)]
    pub status: Option<String>,
    /// Classifier weights are loaded.
    #[serde(default)]
    pub model_loaded: bool,
    /// Database answered a probe query.
    #[serde(default)]
    pub database_connected: bool,
    /// Upload directory exists.
    #[serde(default)]
    pub upload_folder: bool,
    /// Failure detail on a 500 response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    /// Whether the backend's own `status` field reads `healthy`.
    #[must_use]
    pub fn reports_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }
}

/// Body of `GET /chat/health`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatHealthResponse {
    /// Chat service is reachable and configured.
    #[serde(default)]
    pub success: bool,
    /// `healthy` or `unhealthy`.
    #[serde(default)]
    pub status: Option<String>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /chat/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// User message text.
    pub message: String,
    /// Client identity the conversation belongs to.
    pub user_id: String,
}

/// Response to a chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// Whether a reply was generated.
    #[serde(default)]
    pub success: bool,
    /// Assistant reply text.
    #[serde(default)]
    pub response: Option<String>,
    /// Server timestamp of the reply.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Failure summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional failure detail on internal errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person using the client.
    User,
    /// The DermAI assistant.
    Assistant,
    /// Any role this client does not know about.
    #[serde(other)]
    Other,
}

/// One stored chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message identifier.
    pub id: String,
    /// Author role.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// Creation timestamp.
    pub timestamp: String,
}

/// Body of `GET /chat/chat/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatHistoryResponse {
    /// Whether the history was loaded.
    #[serde(default)]
    pub success: bool,
    /// Messages in chronological order.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /chat/chat/clear`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearChatRequest {
    /// Conversation owner.
    pub user_id: String,
}

/// Response to a clear request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearChatResponse {
    /// Whether the conversation was cleared.
    #[serde(default)]
    pub success: bool,
    /// Confirmation text.
    #[serde(default)]
    pub message: Option<String>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single classifier prediction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// Diagnosis label.
    pub condition: String,
    /// Confidence on a 0-100 scale.
    pub confidence: f64,
    /// Free-text assessment such as `High Confidence Assessment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    /// Machine category such as `high` or `inconclusive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<String>,
}

impl Prediction {
    /// Resolve the label against the condition catalog.
    #[must_use]
    pub fn resolve(&self, policy: SeverityPolicy) -> ResolvedCondition {
        resolve(&self.condition, self.confidence, policy)
    }

    /// Badge band for the report header.
    #[must_use]
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_percentage(self.confidence)
    }
}

/// Bullet points generated by the backend for each report section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailedAnalysis {
    /// Condition overview.
    #[serde(default)]
    pub overview: Vec<String>,
    /// Key symptoms.
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Treatment approaches.
    #[serde(default)]
    pub treatment: Vec<String>,
    /// Prevention guidelines.
    #[serde(default)]
    pub prevention: Vec<String>,
    /// Medical attention indicators.
    #[serde(default)]
    pub warning: Vec<String>,
}

impl DetailedAnalysis {
    /// Lines for one section.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Overview => &self.overview,
            SectionKind::Symptoms => &self.symptoms,
            SectionKind::Treatment => &self.treatment,
            SectionKind::Prevention => &self.prevention,
            SectionKind::Warning => &self.warning,
        }
    }
}

/// Report header metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportMetadata {
    /// Generation time.
    pub timestamp: String,
    /// Human-facing report number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    /// Kind of assessment performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
}

/// Disclaimer and suggested follow-ups attached to a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientGuidance {
    /// Medical disclaimer text.
    #[serde(default)]
    pub disclaimer: Option<String>,
    /// Suggested next steps.
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// Full analysis result as returned by analyze and detail calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    /// Stored analysis identifier; set once the backend has persisted the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Header metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_metadata: Option<ReportMetadata>,
    /// Top prediction.
    pub primary_analysis: Prediction,
    /// Runner-up predictions.
    #[serde(default)]
    pub differential_diagnoses: Vec<Prediction>,
    /// Section bullet points.
    #[serde(default)]
    pub detailed_analysis: DetailedAnalysis,
    /// Disclaimer and next steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_guidance: Option<PatientGuidance>,
    /// Base64-encoded JPEG thumbnail of the analysed image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_preview: Option<String>,
}

impl AnalysisReport {
    /// Assemble the five display sections, falling back to catalog text.
    #[must_use]
    pub fn sections(&self) -> Vec<ReportSection> {
        let resolved = self.primary_analysis.resolve(SeverityPolicy::Listing);
        ReportSection::assemble_all(resolved.record, |kind| {
            self.detailed_analysis.section(kind)
        })
    }

    /// Decode the image preview, if present.
    ///
    /// # Errors
    ///
    /// Returns the decode error when the preview is not valid base64.
    pub fn decode_image_preview(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.image_preview
            .as_deref()
            .map(|encoded| general_purpose::STANDARD.decode(encoded.trim()))
    }

    /// Parsed generation time from the report metadata.
    #[must_use]
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.report_metadata
            .as_ref()
            .and_then(|meta| parse_timestamp(&meta.timestamp))
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    /// Whether the analysis completed.
    #[serde(default)]
    pub success: bool,
    /// Analysis result.
    #[serde(default)]
    pub result: Option<AnalysisReport>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Server timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// One row of the analysis history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSummary {
    /// Analysis identifier.
    pub id: String,
    /// Creation time.
    pub timestamp: String,
    /// Top diagnosis label.
    pub primary_condition: String,
    /// Confidence of the top diagnosis.
    pub confidence: f64,
    /// Stored section bullet points.
    #[serde(default)]
    pub detailed_analysis: DetailedAnalysis,
}

impl AnalysisSummary {
    /// Tier under the listing policy used by the history table and filter.
    #[must_use]
    pub fn listing_tier(&self) -> SeverityTier {
        SeverityPolicy::Listing.tier(self.confidence)
    }

    /// Case-insensitive match on condition label or identifier.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.primary_condition.to_lowercase().contains(&needle)
            || self.id.to_lowercase().contains(&needle)
    }

    /// Parsed creation time.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Body of `GET /api/analysis/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisHistoryResponse {
    /// Whether the history was loaded.
    #[serde(default)]
    pub success: bool,
    /// Analyses, newest first.
    #[serde(default)]
    pub history: Vec<AnalysisSummary>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `GET /api/analysis/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisDetailResponse {
    /// Whether the analysis was found.
    #[serde(default)]
    pub success: bool,
    /// Full report.
    #[serde(default)]
    pub result: Option<AnalysisReport>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /api/analysis/delete`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAnalysisRequest {
    /// Analysis to delete.
    pub analysis_id: String,
}

/// Response to a delete request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAnalysisResponse {
    /// Whether the analysis was deleted.
    #[serde(default)]
    pub success: bool,
    /// Confirmation text.
    #[serde(default)]
    pub message: Option<String>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status of one backend component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentStatus {
    /// `healthy`, `error`, or `unknown`.
    pub status: String,
    /// Human-readable detail.
    #[serde(default)]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// Whether the component reports `healthy`.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Per-component breakdown from the system status endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemServices {
    /// Chat assistant.
    pub chat_service: ComponentStatus,
    /// Image classifier.
    pub analysis_service: ComponentStatus,
    /// Backing database.
    pub database: ComponentStatus,
}

/// Body of `GET /api/system/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemStatusResponse {
    /// True when every component is healthy.
    #[serde(default)]
    pub success: bool,
    /// Component breakdown.
    #[serde(default)]
    pub services: Option<SystemServices>,
    /// Failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl_envelope!(
    ChatHealthResponse,
    ChatReply,
    ChatHistoryResponse,
    ClearChatResponse,
    AnalyzeResponse,
    AnalysisHistoryResponse,
    AnalysisDetailResponse,
    DeleteAnalysisResponse,
    SystemStatusResponse,
);

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and the naive ISO-8601 form the backend emits (read as UTC).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
