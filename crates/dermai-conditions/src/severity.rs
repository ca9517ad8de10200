//! Confidence-to-tier triage.
//!
//! Two call sites disagree on both scale and direction, and each keeps its own
//! rule:
//! - [`SeverityPolicy::Listing`] reads confidence as a 0-100 percentage and
//!   flags *very confident* results as urgent (`> 95`), low ones as pending
//!   (`< 85`).
//! - [`SeverityPolicy::Summary`] reads confidence as a 0-1 fraction and flags
//!   *unconfident* results as urgent (`< 0.5`), then pending (`< 0.7`).
//!
//! Tiers are display triage only and are recomputed on every read.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Triage bucket shown next to an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    /// Needs attention first.
    Urgent,
    /// Waiting for review.
    Pending,
    /// Considered reviewed.
    Reviewed,
}

impl SeverityTier {
    /// Lowercase wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
        }
    }

    /// Capitalised label for tables.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
        }
    }
}

impl Display for SeverityTier {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SeverityTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "urgent" => Ok(Self::Urgent),
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            other => Err(format!("invalid severity tier '{other}'")),
        }
    }
}

/// Threshold rule used to bucket a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityPolicy {
    /// Analysis listing and status filter, percentage scale.
    Listing,
    /// Dashboard counters, fractional scale.
    Summary,
}

impl SeverityPolicy {
    /// Listing: strictly above this is urgent.
    pub const LISTING_URGENT_ABOVE: f64 = 95.0;
    /// Listing: strictly below this is pending.
    pub const LISTING_PENDING_BELOW: f64 = 85.0;
    /// Summary: strictly below this is urgent.
    pub const SUMMARY_URGENT_BELOW: f64 = 0.5;
    /// Summary: strictly below this is pending.
    pub const SUMMARY_PENDING_BELOW: f64 = 0.7;

    /// Bucket a confidence score.
    #[must_use]
    pub fn tier(self, confidence: f64) -> SeverityTier {
        match self {
            Self::Listing => {
                if confidence > Self::LISTING_URGENT_ABOVE {
                    SeverityTier::Urgent
                } else if confidence < Self::LISTING_PENDING_BELOW {
                    SeverityTier::Pending
                } else {
                    SeverityTier::Reviewed
                }
            }
            Self::Summary => {
                if confidence < Self::SUMMARY_URGENT_BELOW {
                    SeverityTier::Urgent
                } else if confidence < Self::SUMMARY_PENDING_BELOW {
                    SeverityTier::Pending
                } else {
                    SeverityTier::Reviewed
                }
            }
        }
    }
}

/// Colour band for the confidence badge on a report header (percentage scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// `>= 90`.
    High,
    /// `>= 70`.
    Moderate,
    /// Everything else.
    Low,
}

impl ConfidenceBand {
    /// Band a percentage confidence.
    #[must_use]
    pub fn from_percentage(confidence: f64) -> Self {
        if confidence >= 90.0 {
            Self::High
        } else if confidence >= 70.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

/// Dashboard counters over an analysis history.
///
/// `pending_review` counts every score under the pending threshold, so it
/// includes the urgent ones; `pending_review + reviewed == total_scans` holds
/// for finite scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    /// Number of analyses.
    pub total_scans: usize,
    /// Scores below the summary pending threshold.
    pub pending_review: usize,
    /// Scores below the summary urgent threshold.
    pub urgent_cases: usize,
    /// Scores at or above the summary pending threshold.
    pub reviewed: usize,
}

impl ReviewSummary {
    /// Count a sequence of confidence scores.
    #[must_use]
    pub fn from_confidences<I>(confidences: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        confidences
            .into_iter()
            .fold(Self::default(), |mut summary, confidence| {
                summary.total_scans += 1;
                if confidence < SeverityPolicy::SUMMARY_PENDING_BELOW {
                    summary.pending_review += 1;
                }
                if confidence < SeverityPolicy::SUMMARY_URGENT_BELOW {
                    summary.urgent_cases += 1;
                }
                if confidence >= SeverityPolicy::SUMMARY_PENDING_BELOW {
                    summary.reviewed += 1;
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_policy_thresholds_are_strict() {
        let policy = SeverityPolicy::Listing;
        assert_eq!(policy.tier(99.2), SeverityTier::Urgent);
        assert_eq!(policy.tier(95.0), SeverityTier::Reviewed);
        assert_eq!(policy.tier(90.0), SeverityTier::Reviewed);
        assert_eq!(policy.tier(85.0), SeverityTier::Reviewed);
        assert_eq!(policy.tier(84.99), SeverityTier::Pending);
        assert_eq!(policy.tier(0.0), SeverityTier::Pending);
    }

    #[test]
    fn summary_policy_thresholds_are_strict() {
        let policy = SeverityPolicy::Summary;
        assert_eq!(policy.tier(0.1), SeverityTier::Urgent);
        assert_eq!(policy.tier(0.5), SeverityTier::Pending);
        assert_eq!(policy.tier(0.69), SeverityTier::Pending);
        assert_eq!(policy.tier(0.7), SeverityTier::Reviewed);
        assert_eq!(policy.tier(97.0), SeverityTier::Reviewed);
    }

    #[test]
    fn tiering_is_repeatable() {
        for policy in [SeverityPolicy::Listing, SeverityPolicy::Summary] {
            for confidence in [0.0, 0.49, 0.7, 50.0, 85.0, 95.0, 95.5, 100.0] {
                assert_eq!(policy.tier(confidence), policy.tier(confidence));
            }
        }
    }

    #[test]
    fn tier_round_trips_through_filter_strings() {
        for tier in [
            SeverityTier::Urgent,
            SeverityTier::Pending,
            SeverityTier::Reviewed,
        ] {
            assert_eq!(tier.as_str().parse::<SeverityTier>(), Ok(tier));
        }
        assert!("all".parse::<SeverityTier>().is_err());
    }

    #[test]
    fn confidence_bands_follow_report_header_rules() {
        assert_eq!(ConfidenceBand::from_percentage(90.0), ConfidenceBand::High);
        assert_eq!(
            ConfidenceBand::from_percentage(89.9),
            ConfidenceBand::Moderate
        );
        assert_eq!(
            ConfidenceBand::from_percentage(70.0),
            ConfidenceBand::Moderate
        );
        assert_eq!(ConfidenceBand::from_percentage(69.9), ConfidenceBand::Low);
    }

    #[test]
    fn summary_counts_overlap_like_the_dashboard() {
        let summary = ReviewSummary::from_confidences([0.2, 0.6, 0.7, 0.95, 88.0]);
        assert_eq!(
            summary,
            ReviewSummary {
                total_scans: 5,
                pending_review: 2,
                urgent_cases: 1,
                reviewed: 3,
            }
        );
    }

    #[test]
    fn empty_history_yields_zeroes() {
        assert_eq!(
            ReviewSummary::from_confidences(Vec::new()),
            ReviewSummary::default()
        );
    }
}
