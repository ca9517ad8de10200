//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use dermai_api_models::{
    AnalysisReport, AnalysisSummary, ChatMessage, ChatReply, ChatRole, ComponentStatus,
    SystemStatusResponse,
};
use dermai_client::{ChatLink, ServiceStatus};
use dermai_conditions::{
    ConditionCode, ConditionRecord, ConfidenceBand, MEDICAL_DISCLAIMER, ReportSection,
    ReviewSummary, SectionKind, SeverityPolicy, SeverityTier, records,
};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

const fn flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[derive(Serialize)]
struct ServiceStatusView<'a> {
    #[serde(flatten)]
    status: &'a ServiceStatus,
    healthy: bool,
}

pub(crate) fn render_service_status(status: &ServiceStatus, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&ServiceStatusView {
            status,
            healthy: status.is_healthy(),
        }),
        OutputFormat::Table => {
            println!("model loaded:       {}", flag(status.model_loaded));
            println!("database connected: {}", flag(status.database_connected));
            println!("upload folder:      {}", flag(status.upload_folder_ready));
            println!(
                "overall:            {}",
                if status.is_healthy() {
                    "healthy"
                } else {
                    "unavailable"
                }
            );
            Ok(())
        }
    }
}

pub(crate) fn render_system_status(
    response: &SystemStatusResponse,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(response),
        OutputFormat::Table => {
            println!("{:<18} {:<10} MESSAGE", "SERVICE", "STATUS");
            if let Some(services) = &response.services {
                let rows: [(&str, &ComponentStatus); 3] = [
                    ("chat", &services.chat_service),
                    ("analysis", &services.analysis_service),
                    ("database", &services.database),
                ];
                for (name, component) in rows {
                    println!(
                        "{:<18} {:<10} {}",
                        name,
                        component.status,
                        component.message.as_deref().unwrap_or("-")
                    );
                }
            }
            println!(
                "overall: {}",
                if response.success {
                    "healthy"
                } else {
                    "degraded"
                }
            );
            Ok(())
        }
    }
}

pub(crate) fn render_chat_link(link: &ChatLink, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(link),
        OutputFormat::Table => {
            let state = if link.connected {
                "connected"
            } else {
                "disconnected"
            };
            println!("chat service: {state} (checks: {})", link.attempts);
            Ok(())
        }
    }
}

pub(crate) fn render_chat_reply(reply: &ChatReply, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(reply),
        OutputFormat::Table => {
            println!("{}", reply.response.as_deref().unwrap_or_default());
            Ok(())
        }
    }
}

const fn role_label(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "you",
        ChatRole::Assistant => "dermai",
        ChatRole::Other => "system",
    }
}

pub(crate) fn render_chat_history(messages: &[ChatMessage], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(messages),
        OutputFormat::Table => {
            if messages.is_empty() {
                println!("No messages yet.");
            }
            for message in messages {
                println!(
                    "[{}] {}: {}",
                    message.timestamp,
                    role_label(message.role),
                    message.content
                );
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct DashboardRow<'a> {
    #[serde(flatten)]
    analysis: &'a AnalysisSummary,
    status: SeverityTier,
}

#[derive(Serialize)]
struct DashboardView<'a> {
    summary: &'a ReviewSummary,
    analyses: Vec<DashboardRow<'a>>,
}

fn format_timestamp(analysis: &AnalysisSummary) -> String {
    analysis.created_at().map_or_else(
        || analysis.timestamp.clone(),
        |created| created.format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub(crate) fn render_dashboard(
    summary: &ReviewSummary,
    analyses: &[&AnalysisSummary],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&DashboardView {
            summary,
            analyses: analyses
                .iter()
                .map(|analysis| DashboardRow {
                    analysis,
                    status: analysis.listing_tier(),
                })
                .collect(),
        }),
        OutputFormat::Table => {
            println!(
                "total scans: {}  pending review: {}  urgent: {}  reviewed: {}",
                summary.total_scans, summary.pending_review, summary.urgent_cases, summary.reviewed
            );
            println!();
            println!(
                "{:<36} {:<16} {:<26} {:>8} STATUS",
                "ID", "DATE", "CONDITION", "CONF"
            );
            for analysis in analyses {
                println!(
                    "{:<36} {:<16} {:<26} {:>7.1}% {}",
                    analysis.id,
                    format_timestamp(analysis),
                    analysis.primary_condition,
                    analysis.confidence,
                    analysis.listing_tier().title()
                );
            }
            if analyses.is_empty() {
                println!("No analyses match.");
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    confidence_band: ConfidenceBand,
    sections: Vec<ReportSection>,
    disclaimer: Vec<&'a str>,
}

/// The backend's disclaimer when it sends one, otherwise the built-in text.
fn disclaimer_lines(report: &AnalysisReport) -> Vec<&str> {
    report
        .patient_guidance
        .as_ref()
        .and_then(|guidance| guidance.disclaimer.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map_or_else(|| MEDICAL_DISCLAIMER.to_vec(), |text| vec![text])
}

pub(crate) fn render_report(report: &AnalysisReport, format: OutputFormat) -> CliResult<()> {
    let sections = report.sections();
    let disclaimer = disclaimer_lines(report);
    match format {
        OutputFormat::Json => print_json(&ReportView {
            report,
            confidence_band: report.primary_analysis.band(),
            sections,
            disclaimer,
        }),
        OutputFormat::Table => {
            render_report_header(report);
            for section in &sections {
                println!();
                println!("{}", section.kind.title());
                for line in section.content.lines() {
                    println!("  - {line}");
                }
            }
            println!();
            println!("Medical disclaimer");
            for line in &disclaimer {
                println!("  - {line}");
            }
            if let Some(guidance) = &report.patient_guidance {
                if !guidance.next_steps.is_empty() {
                    println!();
                    println!("Next steps");
                    for step in &guidance.next_steps {
                        println!("  - {step}");
                    }
                }
            }
            Ok(())
        }
    }
}

fn render_report_header(report: &AnalysisReport) {
    if let Some(id) = &report.id {
        println!("analysis: {id}");
    }
    if let Some(meta) = &report.report_metadata {
        if let Some(report_id) = &meta.report_id {
            println!("report: {report_id}");
        }
        let generated = report.generated_at().map_or_else(
            || meta.timestamp.clone(),
            |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
        );
        println!("generated: {generated}");
        if let Some(kind) = &meta.analysis_type {
            println!("type: {kind}");
        }
    }

    let primary = &report.primary_analysis;
    let resolved = primary.resolve(SeverityPolicy::Listing);
    match resolved.code {
        Some(code) => println!("condition: {} ({code})", primary.condition),
        None => println!("condition: {}", primary.condition),
    }
    println!(
        "confidence: {:.1}% ({}) status: {}",
        primary.confidence,
        primary.band().as_str(),
        resolved.tier.title()
    );
    if let Some(assessment) = &primary.assessment {
        println!("assessment: {assessment}");
    }
    if !report.differential_diagnoses.is_empty() {
        println!("differential:");
        for candidate in &report.differential_diagnoses {
            println!("  - {} {:.1}%", candidate.condition, candidate.confidence);
        }
    }
}

pub(crate) fn render_condition_list(format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let catalog: Vec<&ConditionRecord> = records().collect();
            print_json(&catalog)
        }
        OutputFormat::Table => {
            println!("{:<28} LABEL", "CODE");
            for code in ConditionCode::ALL {
                println!("{:<28} {}", code.as_str(), code.label());
            }
            Ok(())
        }
    }
}

pub(crate) fn render_condition(record: &ConditionRecord, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            println!("{} ({})", record.code.label(), record.code);
            for kind in SectionKind::ALL {
                println!();
                println!("{}", kind.title());
                let lines = kind.reference_lines(record);
                if lines.is_empty() {
                    println!("  - {}", dermai_conditions::NO_INFORMATION);
                }
                for line in lines {
                    println!("  - {line}");
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dermai_api_models::{PatientGuidance, Prediction};

    fn report_with(guidance: Option<PatientGuidance>) -> AnalysisReport {
        AnalysisReport {
            primary_analysis: Prediction {
                condition: "Ringworm".to_string(),
                confidence: 90.0,
                ..Prediction::default()
            },
            patient_guidance: guidance,
            ..AnalysisReport::default()
        }
    }

    #[test]
    fn built_in_disclaimer_is_used_when_backend_sends_none() {
        assert_eq!(disclaimer_lines(&report_with(None)), MEDICAL_DISCLAIMER.to_vec());

        let blank = report_with(Some(PatientGuidance {
            disclaimer: Some("  ".to_string()),
            next_steps: vec!["Book a visit".to_string()],
        }));
        assert_eq!(disclaimer_lines(&blank), MEDICAL_DISCLAIMER.to_vec());
    }

    #[test]
    fn backend_disclaimer_replaces_the_built_in_text() {
        let report = report_with(Some(PatientGuidance {
            disclaimer: Some("Consult a dermatologist.".to_string()),
            next_steps: Vec::new(),
        }));
        assert_eq!(disclaimer_lines(&report), vec!["Consult a dermatologist."]);
    }
}
