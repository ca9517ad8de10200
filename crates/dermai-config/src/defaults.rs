//! Built-in defaults used when neither a settings file nor an override
//! provides a value.

use std::path::PathBuf;
use std::time::Duration;

/// Backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Timeout for ordinary JSON calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Interval between health polls.
pub const DEFAULT_HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Delay before a failed chat connectivity check is retried.
pub const DEFAULT_CHAT_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Timeout for the image upload request.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
/// Largest accepted upload (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const IDENTITY_DIR: &str = ".dermai";
const IDENTITY_FILE: &str = "identity";
const FALLBACK_IDENTITY_FILE: &str = ".dermai-identity";

/// Identity file location: `$HOME/.dermai/identity`, or `.dermai-identity`
/// in the working directory when no home directory is set.
#[must_use]
pub fn default_identity_file() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(
            || PathBuf::from(FALLBACK_IDENTITY_FILE),
            |home| PathBuf::from(home).join(IDENTITY_DIR).join(IDENTITY_FILE),
        )
}
