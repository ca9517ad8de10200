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

//! Client settings for the DermAI workspace.
//!
//! Layout: `defaults.rs` (built-in values), `model.rs` (resolved settings,
//! settings file document, overrides), `loader.rs` (layering and validation),
//! `identity.rs` (persistent client user id).

mod defaults;
pub mod error;
pub mod identity;
pub mod loader;
pub mod model;

pub use defaults::{
    DEFAULT_API_URL, DEFAULT_CHAT_RETRY_DELAY, DEFAULT_HEALTH_POLL_INTERVAL,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_REQUEST_TIMEOUT, DEFAULT_UPLOAD_TIMEOUT,
    default_identity_file,
};
pub use error::{ConfigError, ConfigResult};
pub use identity::IdentityStore;
pub use loader::load_settings;
pub use model::{ClientSettings, SettingsFile, SettingsOverrides};
