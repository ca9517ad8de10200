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
#![allow(clippy::module_name_repetitions)]

//! Async client for the DermAI backend.
//!
//! Layout:
//! - `client.rs`: [`DermaiClient`], one method per endpoint
//! - `upload.rs`: local image validation ahead of upload
//! - `health.rs`: health polling and the aggregated [`ServiceStatus`]
//! - `connectivity.rs`: chat connectivity with single-retry scheduling
//! - `identity.rs`, `operation.rs`, `error.rs`: supporting types

pub mod client;
pub mod connectivity;
pub mod error;
pub mod health;
pub mod identity;
pub mod operation;
pub mod upload;

pub use client::DermaiClient;
pub use connectivity::{ChatConnectivity, ChatConnectivityHandle, ChatLink, ChatProbe};
pub use error::{ClientError, ClientResult, UploadError};
pub use health::{HealthMonitor, HealthMonitorHandle, HealthProbe, ServiceStatus};
pub use identity::ClientIdentity;
pub use operation::Operation;
pub use upload::{ImageKind, ImageUpload};
