//! Settings models.
//!
//! [`SettingsFile`] mirrors the optional JSON document on disk,
//! [`SettingsOverrides`] carries command-line and environment values, and
//! [`ClientSettings`] is the validated result of layering both over the
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

use dermai_telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use url::Url;

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Backend base URL.
    pub api_url: Url,
    /// Timeout for ordinary JSON calls.
    pub request_timeout: Duration,
    /// Interval between health polls.
    pub health_poll_interval: Duration,
    /// Delay before a failed chat connectivity check is retried.
    pub chat_retry_delay: Duration,
    /// Timeout for the image upload request.
    pub upload_timeout: Duration,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: u64,
    /// Log output format.
    pub log_format: LogFormat,
    /// Where the generated user id is persisted.
    pub identity_file: PathBuf,
    /// Explicit user id; bypasses the identity file when set.
    pub user_id: Option<String>,
}

/// On-disk settings document. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Backend base URL.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Health poll interval in seconds.
    #[serde(default)]
    pub health_poll_interval_secs: Option<u64>,
    /// Chat retry delay in seconds.
    #[serde(default)]
    pub chat_retry_delay_secs: Option<u64>,
    /// Upload timeout in seconds.
    #[serde(default)]
    pub upload_timeout_secs: Option<u64>,
    /// Upload size limit in bytes.
    #[serde(default)]
    pub max_upload_bytes: Option<u64>,
    /// `json` or `pretty`.
    #[serde(default)]
    pub log_format: Option<LogFormat>,
    /// Identity file location.
    #[serde(default)]
    pub identity_file: Option<PathBuf>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// Backend base URL.
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Explicit user id.
    pub user_id: Option<String>,
    /// Log output format.
    pub log_format: Option<LogFormat>,
}
