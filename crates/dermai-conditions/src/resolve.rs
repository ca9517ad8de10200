//! One-call resolution of a diagnosis label and confidence score.

use serde::Serialize;

use crate::catalog::{ConditionRecord, record_for};
use crate::code::ConditionCode;
use crate::severity::{SeverityPolicy, SeverityTier};

/// Display bundle for a single diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCondition {
    /// Label as reported by the backend.
    pub label: String,
    /// Canonical code, when the label resolves.
    pub code: Option<ConditionCode>,
    /// Catalog record, absent for unknown labels.
    pub record: Option<&'static ConditionRecord>,
    /// Triage tier under the requested policy.
    pub tier: SeverityTier,
}

impl ResolvedCondition {
    /// Whether the catalog knows this condition.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.record.is_some()
    }
}

/// Resolve a diagnosis label to its catalog record and bucket its confidence.
///
/// Unknown labels are not an error: the bundle simply carries no record and
/// callers render their fallback text.
#[must_use]
pub fn resolve(label: &str, confidence: f64, policy: SeverityPolicy) -> ResolvedCondition {
    let code = ConditionCode::resolve_label(label);
    ResolvedCondition {
        label: label.to_string(),
        code,
        record: code.map(record_for),
        tier: policy.tier(confidence),
    }
}
