//! Shared command context and error types for the CLI.

use std::fmt::{self, Display, Formatter};

use anyhow::anyhow;
use dermai_client::{ClientError, DermaiClient};
use dermai_config::{ClientSettings, ConfigError};
use dermai_telemetry::Metrics;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::InvalidInput { .. } | ClientError::Upload(_) => {
                Self::validation(err.to_string())
            }
            ClientError::Rejected { status, .. } if (400..500).contains(status) => {
                Self::validation(err.to_string())
            }
            _ => Self::failure(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match &err {
            ConfigError::InvalidField { .. } => Self::validation(err.to_string()),
            ConfigError::Parse { path, .. } => {
                let message = format!("{err} ({})", path.display());
                Self::failure(anyhow::Error::new(err).context(message))
            }
            ConfigError::Io {
                operation, path, ..
            } => {
                let message = format!("{operation} failed for {}", path.display());
                Self::failure(anyhow::Error::new(err).context(message))
            }
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: DermaiClient,
    pub(crate) settings: ClientSettings,
    pub(crate) metrics: Metrics,
}

impl AppContext {
    pub(crate) fn new(settings: ClientSettings, client: DermaiClient) -> CliResult<Self> {
        let metrics = Metrics::new()
            .map_err(|err| CliError::failure(anyhow!("failed to initialise metrics: {err}")))?;
        Ok(Self {
            client: client.with_metrics(metrics.clone()),
            settings,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dermai_client::{Operation, UploadError};

    #[test]
    fn client_input_problems_are_validation_errors() {
        let err = CliError::from(ClientError::Upload(UploadError::UnsupportedType {
            detected: "gif".to_string(),
        }));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.display_message(),
            "Please upload a valid image file (JPEG or PNG)"
        );
    }

    #[test]
    fn not_found_is_validation_and_server_errors_are_failures() {
        let missing = CliError::from(ClientError::Rejected {
            operation: Operation::AnalysisDetail,
            status: 404,
            message: "Analysis not found".to_string(),
        });
        assert!(matches!(missing, CliError::Validation(ref message) if message == "Analysis not found"));

        let server = CliError::from(ClientError::Rejected {
            operation: Operation::AnalysisHistory,
            status: 500,
            message: "Failed to fetch analysis history".to_string(),
        });
        assert_eq!(server.exit_code(), 3);
        assert_eq!(server.display_message(), "Failed to fetch analysis history");
    }

    #[test]
    fn config_validation_maps_to_exit_code_two() {
        let err = CliError::from(ConfigError::InvalidField {
            section: "http",
            field: "api_url",
            value: Some("ftp://x".to_string()),
            reason: "scheme must be http or https",
        });
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("api_url"));
    }
}
