//! Report section assembly.
//!
//! Each section prefers the bullet points produced by the backend analysis,
//! falls back to the catalog record for the resolved condition, and finally
//! to a fixed "no information" placeholder.

use serde::Serialize;

use crate::catalog::ConditionRecord;

/// Placeholder shown when neither the analysis nor the catalog has content.
pub const NO_INFORMATION: &str = "No information available for this section";

/// Disclaimer shown with every report that does not carry its own.
pub const MEDICAL_DISCLAIMER: [&str; 3] = [
    "This analysis is provided by an AI system and should NOT replace professional medical evaluation.",
    "The results should be reviewed by a qualified healthcare provider.",
    "Seek immediate medical attention for severe symptoms or rapid condition progression.",
];

/// The five sections of an analysis report, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Condition overview.
    Overview,
    /// Key symptoms.
    Symptoms,
    /// Treatment approaches.
    Treatment,
    /// Prevention guidelines.
    Prevention,
    /// Warning signs.
    Warning,
}

impl SectionKind {
    /// Display order.
    pub const ALL: [Self; 5] = [
        Self::Overview,
        Self::Symptoms,
        Self::Treatment,
        Self::Prevention,
        Self::Warning,
    ];

    /// Heading shown above the section.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Symptoms => "Key Symptoms",
            Self::Treatment => "Treatment Approaches",
            Self::Prevention => "Prevention Guidelines",
            Self::Warning => "Warning Signs",
        }
    }

    /// Catalog lines backing this section.
    #[must_use]
    pub fn reference_lines(self, record: &ConditionRecord) -> Vec<&'static str> {
        match self {
            Self::Overview => vec![record.description],
            Self::Symptoms => record.symptoms_or_empty().to_vec(),
            Self::Treatment => record.remedies.to_vec(),
            Self::Prevention => record.precautions.to_vec(),
            Self::Warning => record.emergency_signs.to_vec(),
        }
    }
}

/// Where a section's lines came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "lines", rename_all = "snake_case")]
pub enum SectionContent {
    /// Lines produced by the backend analysis.
    Analysis(Vec<String>),
    /// Lines taken from the condition catalog.
    Reference(Vec<String>),
    /// Nothing to show.
    Unavailable,
}

impl SectionContent {
    /// Lines to render, with the placeholder for empty sections.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Analysis(lines) | Self::Reference(lines) => {
                lines.iter().map(String::as_str).collect()
            }
            Self::Unavailable => vec![NO_INFORMATION],
        }
    }
}

/// One rendered report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Which section this is.
    pub kind: SectionKind,
    /// Section body.
    pub content: SectionContent,
}

impl ReportSection {
    /// Build a single section from backend lines and an optional catalog record.
    #[must_use]
    pub fn assemble(
        kind: SectionKind,
        analysis: &[String],
        record: Option<&ConditionRecord>,
    ) -> Self {
        let content = if !analysis.is_empty() {
            SectionContent::Analysis(analysis.to_vec())
        } else {
            match record.map(|record| kind.reference_lines(record)) {
                Some(lines) if !lines.is_empty() => {
                    SectionContent::Reference(lines.into_iter().map(str::to_string).collect())
                }
                _ => SectionContent::Unavailable,
            }
        };
        Self { kind, content }
    }

    /// Build all five sections in display order.
    pub fn assemble_all<'a, F>(record: Option<&ConditionRecord>, mut analysis: F) -> Vec<Self>
    where
        F: FnMut(SectionKind) -> &'a [String],
    {
        SectionKind::ALL
            .into_iter()
            .map(|kind| Self::assemble(kind, analysis(kind), record))
            .collect()
    }
}
