//! Settings layering: defaults, then the settings file, then overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use dermai_telemetry::LogFormat;
use tracing::debug;
use url::Url;

use crate::defaults::{
    DEFAULT_API_URL, DEFAULT_CHAT_RETRY_DELAY, DEFAULT_HEALTH_POLL_INTERVAL,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_REQUEST_TIMEOUT, DEFAULT_UPLOAD_TIMEOUT,
    default_identity_file,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ClientSettings, SettingsFile, SettingsOverrides};

/// Resolve client settings.
///
/// `file`, when given, must exist and contain a JSON [`SettingsFile`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] when the settings
/// file cannot be read, and [`ConfigError::InvalidField`] when a resolved
/// value fails validation.
pub fn load_settings(
    file: Option<&Path>,
    overrides: &SettingsOverrides,
) -> ConfigResult<ClientSettings> {
    let document = match file {
        Some(path) => read_settings_file(path)?,
        None => SettingsFile::default(),
    };
    resolve(document, overrides)
}

fn read_settings_file(path: &Path) -> ConfigResult<SettingsFile> {
    let raw =
        fs::read_to_string(path).map_err(|err| ConfigError::io("read settings file", path, err))?;
    debug!(path = %path.display(), "loaded settings file");
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(document: SettingsFile, overrides: &SettingsOverrides) -> ConfigResult<ClientSettings> {
    let api_url = overrides
        .api_url
        .clone()
        .or(document.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let request_timeout = seconds(
        "request_timeout_secs",
        overrides
            .request_timeout_secs
            .or(document.request_timeout_secs),
        DEFAULT_REQUEST_TIMEOUT,
    )?;
    let user_id = match overrides.user_id.as_deref().map(str::trim) {
        Some("") => {
            return Err(ConfigError::invalid(
                "identity",
                "user_id",
                None,
                "must not be empty",
            ));
        }
        Some(value) => Some(value.to_string()),
        None => None,
    };
    let max_upload_bytes = document
        .max_upload_bytes
        .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
    if max_upload_bytes == 0 {
        return Err(ConfigError::invalid(
            "upload",
            "max_upload_bytes",
            Some("0".to_string()),
            "must be positive",
        ));
    }

    Ok(ClientSettings {
        api_url: parse_api_url(&api_url)?,
        request_timeout,
        health_poll_interval: seconds(
            "health_poll_interval_secs",
            document.health_poll_interval_secs,
            DEFAULT_HEALTH_POLL_INTERVAL,
        )?,
        chat_retry_delay: seconds(
            "chat_retry_delay_secs",
            document.chat_retry_delay_secs,
            DEFAULT_CHAT_RETRY_DELAY,
        )?,
        upload_timeout: seconds(
            "upload_timeout_secs",
            document.upload_timeout_secs,
            DEFAULT_UPLOAD_TIMEOUT,
        )?,
        max_upload_bytes,
        log_format: overrides
            .log_format
            .or(document.log_format)
            .unwrap_or_else(LogFormat::infer),
        identity_file: document
            .identity_file
            .unwrap_or_else(default_identity_file),
        user_id,
    })
}

fn seconds(field: &'static str, value: Option<u64>, default: Duration) -> ConfigResult<Duration> {
    match value {
        None => Ok(default),
        Some(0) => Err(ConfigError::invalid(
            "http",
            field,
            Some("0".to_string()),
            "must be positive",
        )),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

/// Endpoint paths are joined relative to the base, so its path must end in `/`
/// for a prefix such as `/dermai` to survive.
fn parse_api_url(raw: &str) -> ConfigResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|_| {
        ConfigError::invalid("http", "api_url", Some(raw.to_string()), "must be a URL")
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            "http",
            "api_url",
            Some(raw.to_string()),
            "scheme must be http or https",
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
