//! Named backend operations.

use std::fmt::{self, Display, Formatter};

/// One backend call, used for metric labels and fallback error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /api/health`.
    Health,
    /// `GET /chat/health`.
    ChatHealth,
    /// `POST /chat/chat`.
    SendChat,
    /// `GET /chat/chat/history`.
    ChatHistory,
    /// `POST /chat/chat/clear`.
    ClearChat,
    /// `POST /api/analyze`.
    AnalyzeImage,
    /// `GET /api/analysis/history`.
    AnalysisHistory,
    /// `GET /api/analysis/{id}`.
    AnalysisDetail,
    /// `POST /api/analysis/delete`.
    DeleteAnalysis,
    /// `GET /api/system/status`.
    SystemStatus,
}

impl Operation {
    /// Metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::ChatHealth => "chat_health",
            Self::SendChat => "send_chat",
            Self::ChatHistory => "chat_history",
            Self::ClearChat => "clear_chat",
            Self::AnalyzeImage => "analyze_image",
            Self::AnalysisHistory => "analysis_history",
            Self::AnalysisDetail => "analysis_detail",
            Self::DeleteAnalysis => "delete_analysis",
            Self::SystemStatus => "system_status",
        }
    }

    /// Message shown when the backend rejects a call without saying why.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Health => "Health check failed",
            Self::ChatHealth => "Chat service unavailable",
            Self::SendChat => "Failed to get response",
            Self::ChatHistory => "Failed to load chat history",
            Self::ClearChat => "Failed to clear chat history",
            Self::AnalyzeImage => "Failed to analyze image",
            Self::AnalysisHistory => "Failed to fetch analysis history",
            Self::AnalysisDetail => "Failed to fetch analysis details",
            Self::DeleteAnalysis => "Failed to delete analysis",
            Self::SystemStatus => "Failed to fetch system status",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
