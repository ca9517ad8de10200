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

//! Condition catalog and confidence triage for DermAI analysis reports.
//!
//! Layout:
//! - `code.rs`: canonical condition codes and the diagnosis label mapping
//! - `catalog.rs`: the constant medical-information table keyed by code
//! - `severity.rs`: confidence-to-tier policies and dashboard summaries
//! - `sections.rs`: report section assembly with catalog fallback
//! - `resolve.rs`: one-call resolution of a label and confidence

pub mod catalog;
pub mod code;
pub mod error;
pub mod resolve;
pub mod sections;
pub mod severity;

pub use catalog::{ConditionRecord, record_for, record_for_label, records};
pub use code::ConditionCode;
pub use error::ParseConditionCodeError;
pub use resolve::{ResolvedCondition, resolve};
pub use sections::{
    MEDICAL_DISCLAIMER, NO_INFORMATION, ReportSection, SectionContent, SectionKind,
};
pub use severity::{ConfidenceBand, ReviewSummary, SeverityPolicy, SeverityTier};
