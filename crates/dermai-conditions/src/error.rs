//! Error types for condition parsing.

use thiserror::Error;

/// Raised when a string is neither a condition code nor a known diagnosis label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown condition")]
pub struct ParseConditionCodeError {
    /// Input that failed to parse.
    pub value: String,
}
