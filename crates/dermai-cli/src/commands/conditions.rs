use dermai_conditions::record_for_label;

use crate::cli::{ConditionShowArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::output::{render_condition, render_condition_list};

pub(crate) fn handle_condition_list(format: OutputFormat) -> CliResult<()> {
    render_condition_list(format)
}

/// Accepts a diagnosis label or a condition code.
pub(crate) fn handle_condition_show(args: &ConditionShowArgs, format: OutputFormat) -> CliResult<()> {
    let label = args.label.trim();
    let record = record_for_label(label)
        .ok_or_else(|| CliError::validation(format!("unknown condition '{label}'")))?;
    render_condition(record, format)
}
