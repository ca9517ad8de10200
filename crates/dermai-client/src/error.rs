//! Error types for backend calls and upload validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::operation::Operation;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("request to {operation} failed")]
    Transport {
        /// Operation that failed.
        operation: Operation,
        /// Target URL.
        url: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },
    /// The response body was not the expected JSON.
    #[error("response from {operation} could not be decoded")]
    Decode {
        /// Operation that failed.
        operation: Operation,
        /// HTTP status of the response.
        status: u16,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The backend answered but reported failure.
    #[error("{message}")]
    Rejected {
        /// Operation that failed.
        operation: Operation,
        /// HTTP status of the response.
        status: u16,
        /// Backend error text, or the operation's fallback message.
        message: String,
    },
    /// A caller-supplied value cannot be sent.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Offending field.
        field: &'static str,
        /// Why the value was refused.
        reason: &'static str,
    },
    /// Building the HTTP client or request failed.
    #[error("failed to build HTTP request")]
    Build {
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },
    /// The upload was refused before any network call.
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl ClientError {
    /// Operation the error belongs to, when it reached the network layer.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Transport { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Rejected { operation, .. } => Some(*operation),
            Self::InvalidInput { .. } | Self::Build { .. } | Self::Upload(_) => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }
}

/// Reasons an image is refused before upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file is neither JPEG nor PNG.
    #[error("Please upload a valid image file (JPEG or PNG)")]
    UnsupportedType {
        /// Detected or declared type.
        detected: String,
    },
    /// The file exceeds the upload limit.
    #[error("File size should be less than {}", size_label(.limit))]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
    /// The file could not be read.
    #[error("failed to read image file")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl UploadError {
    /// Metric label for the rejection reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::TooLarge { .. } => "too_large",
            Self::Read { .. } => "unreadable",
        }
    }
}

/// Largest whole unit that represents `limit` exactly.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn size_label(limit: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    match *limit {
        0 => "0 bytes".to_string(),
        bytes if bytes % MIB == 0 => format!("{}MB", bytes / MIB),
        bytes if bytes % KIB == 0 => format!("{}KB", bytes / KIB),
        bytes => format!("{bytes} bytes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_displays_backend_message() {
        let err = ClientError::Rejected {
            operation: Operation::AnalysisDetail,
            status: 404,
            message: "Analysis not found".to_string(),
        };
        assert_eq!(err.to_string(), "Analysis not found");
        assert!(err.is_not_found());
        assert_eq!(err.operation(), Some(Operation::AnalysisDetail));
    }

    #[test]
    fn upload_errors_use_user_facing_text() {
        let err = ClientError::from(UploadError::TooLarge {
            size: 12 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        });
        assert_eq!(err.to_string(), "File size should be less than 10MB");
        assert!(err.operation().is_none());
        assert_eq!(
            UploadError::UnsupportedType {
                detected: "image/gif".to_string()
            }
            .reason(),
            "unsupported_type"
        );
    }

    #[test]
    fn small_limits_are_not_rounded_down_to_zero() {
        let cases = [
            (512 * 1024, "File size should be less than 512KB"),
            (1_500_000, "File size should be less than 1500000 bytes"),
            (3 * 1024 * 1024, "File size should be less than 3MB"),
        ];
        for (limit, expected) in cases {
            let err = UploadError::TooLarge {
                size: limit + 1,
                limit,
            };
            assert_eq!(err.to_string(), expected);
        }
    }
}
