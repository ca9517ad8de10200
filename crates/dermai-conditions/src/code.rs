//! Canonical condition codes and the diagnosis label mapping.
//!
//! The classifier reports human-readable labels (`"Creeping Eruption"`); the
//! catalog is keyed by short category-prefixed codes (`PA-cutaneous-larva-migrans`).
//! Labels without a mapping are tried verbatim as codes, so a backend that
//! already emits codes still resolves.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseConditionCodeError;

/// Canonical identifier used as the catalog key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionCode {
    /// Bacterial cellulitis.
    #[serde(rename = "BA-cellulitis")]
    BacterialCellulitis,
    /// Bacterial impetigo.
    #[serde(rename = "BA-impetigo")]
    BacterialImpetigo,
    /// Tinea pedis.
    #[serde(rename = "FU-athlete-foot")]
    AthletesFoot,
    /// Onychomycosis.
    #[serde(rename = "FU-nail-fungus")]
    NailFungus,
    /// Tinea corporis.
    #[serde(rename = "FU-ringworm")]
    Ringworm,
    /// Hookworm-related cutaneous larva migrans.
    #[serde(rename = "PA-cutaneous-larva-migrans")]
    CutaneousLarvaMigrans,
    /// Varicella.
    #[serde(rename = "VI-chickenpox")]
    Chickenpox,
    /// Herpes zoster.
    #[serde(rename = "VI-shingles")]
    Shingles,
}

impl ConditionCode {
    /// Every code in catalog order.
    pub const ALL: [Self; 8] = [
        Self::BacterialCellulitis,
        Self::BacterialImpetigo,
        Self::AthletesFoot,
        Self::NailFungus,
        Self::Ringworm,
        Self::CutaneousLarvaMigrans,
        Self::Chickenpox,
        Self::Shingles,
    ];

    /// Wire form of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BacterialCellulitis => "BA-cellulitis",
            Self::BacterialImpetigo => "BA-impetigo",
            Self::AthletesFoot => "FU-athlete-foot",
            Self::NailFungus => "FU-nail-fungus",
            Self::Ringworm => "FU-ringworm",
            Self::CutaneousLarvaMigrans => "PA-cutaneous-larva-migrans",
            Self::Chickenpox => "VI-chickenpox",
            Self::Shingles => "VI-shingles",
        }
    }

    /// Diagnosis label the classifier emits for this code.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BacterialCellulitis => "Bacterial Cellulitis",
            Self::BacterialImpetigo => "Bacterial Impetigo",
            Self::AthletesFoot => "Athletes Foot",
            Self::NailFungus => "Nail Fungus",
            Self::Ringworm => "Ringworm",
            Self::CutaneousLarvaMigrans => "Creeping Eruption",
            Self::Chickenpox => "Chickenpox",
            Self::Shingles => "Shingles",
        }
    }

    /// Map a diagnosis label through the fixed label table only.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.label() == label)
    }

    /// Resolve a label: label table first, then the label itself as a code.
    #[must_use]
    pub fn resolve_label(label: &str) -> Option<Self> {
        Self::from_label(label).or_else(|| label.parse().ok())
    }
}

impl Display for ConditionCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ConditionCode {
    type Err = ParseConditionCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == value)
            .ok_or_else(|| ParseConditionCodeError {
                value: value.to_string(),
            })
    }
}
