//! Command-line interface for the DermAI backend.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dermai_client::{ClientIdentity, DermaiClient};
use dermai_config::{ClientSettings, IdentityStore, SettingsOverrides, load_settings};
use dermai_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tracing::debug;

use crate::client::{AppContext, CliResult};
use crate::commands::analysis::{handle_analyze, handle_delete, handle_history, handle_report};
use crate::commands::chat::{
    handle_chat_clear, handle_chat_history, handle_chat_send, handle_chat_status,
};
use crate::commands::conditions::{handle_condition_list, handle_condition_show};
use crate::commands::health::{handle_health, handle_status};

const BUILD_SHA: &str = match option_env!("DERMAI_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let settings = load_settings(cli.config.as_deref(), &cli.overrides())?;
    if let Err(err) = init_logging(&LoggingConfig {
        level: DEFAULT_LOG_LEVEL,
        format: settings.log_format,
        build_sha: BUILD_SHA,
    }) {
        eprintln!("warning: {err}");
    }
    debug!(api_url = %settings.api_url, "settings resolved");

    match cli.command {
        Command::Conditions(command) => handle_conditions(command, cli.output),
        command => {
            let ctx = build_context(settings)?;
            dispatch_remote(&ctx, command, cli.output).await
        }
    }
}

async fn dispatch_remote(ctx: &AppContext, command: Command, format: OutputFormat) -> CliResult<()> {
    match command {
        Command::Health(args) => handle_health(ctx, args, format).await,
        Command::Status => handle_status(ctx, format).await,
        Command::Chat(chat) => match chat {
            ChatCommand::Send(args) => handle_chat_send(ctx, &args, format).await,
            ChatCommand::History => handle_chat_history(ctx, format).await,
            ChatCommand::Clear => handle_chat_clear(ctx).await,
            ChatCommand::Status => handle_chat_status(ctx, format).await,
        },
        Command::Analyze(args) => handle_analyze(ctx, &args, format).await,
        Command::History(args) => handle_history(ctx, &args, format).await,
        Command::Report(args) => handle_report(ctx, args, format).await,
        Command::Delete(args) => handle_delete(ctx, &args).await,
        Command::Conditions(command) => handle_conditions(command, format),
    }
}

fn handle_conditions(command: ConditionsCommand, format: OutputFormat) -> CliResult<()> {
    match command {
        ConditionsCommand::List => handle_condition_list(format),
        ConditionsCommand::Show(args) => handle_condition_show(&args, format),
    }
}

pub(crate) fn build_context(settings: ClientSettings) -> CliResult<AppContext> {
    let user_id = match &settings.user_id {
        Some(user_id) => user_id.clone(),
        None => IdentityStore::new(settings.identity_file.clone()).load_or_create()?,
    };
    let identity = ClientIdentity::new(user_id)?;
    let client = DermaiClient::new(&settings, identity)?;
    AppContext::new(settings, client)
}

#[derive(Parser)]
#[command(name = "dermai", about = "Command-line client for the DermAI skin analysis service")]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "DERMAI_API_URL")]
    pub(crate) api_url: Option<String>,
    #[arg(long, global = true, env = "DERMAI_HTTP_TIMEOUT_SECS")]
    pub(crate) timeout: Option<u64>,
    #[arg(long, global = true, env = "DERMAI_USER_ID")]
    pub(crate) user_id: Option<String>,
    #[arg(long, global = true, env = "DERMAI_CONFIG")]
    pub(crate) config: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, value_enum)]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_url: self.api_url.clone(),
            request_timeout_secs: self.timeout,
            user_id: self.user_id.clone(),
            log_format: self.log_format.map(LogFormat::from),
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Check backend readiness.
    Health(HealthArgs),
    /// Show the per-component system status.
    Status,
    /// Talk to the DermAI assistant.
    #[command(subcommand)]
    Chat(ChatCommand),
    /// Upload an image for analysis.
    Analyze(AnalyzeArgs),
    /// List past analyses with dashboard counters.
    History(HistoryArgs),
    /// Show a full analysis report.
    Report(ReportArgs),
    /// Delete a stored analysis.
    Delete(DeleteArgs),
    /// Browse the built-in condition reference.
    #[command(subcommand)]
    Conditions(ConditionsCommand),
}

#[derive(Subcommand)]
pub(crate) enum ChatCommand {
    /// Send a message and print the reply.
    Send(ChatSendArgs),
    /// Print the conversation so far.
    History,
    /// Delete the conversation.
    Clear,
    /// Check chat connectivity, retrying once on failure.
    Status,
}

#[derive(Subcommand)]
pub(crate) enum ConditionsCommand {
    /// List known conditions.
    List,
    /// Show the reference record for a condition.
    Show(ConditionShowArgs),
}

#[derive(Args, Clone, Copy, Debug, Default)]
pub(crate) struct HealthArgs {
    /// Keep polling and print every status change until interrupted.
    #[arg(long)]
    pub(crate) watch: bool,
    /// Print collected metrics on exit (with --watch).
    #[arg(long, requires = "watch")]
    pub(crate) metrics: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ChatSendArgs {
    /// Message text.
    #[arg(required = true, num_args = 1..)]
    pub(crate) message: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JPEG or PNG image to analyse.
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct HistoryArgs {
    /// Case-insensitive match on condition or analysis id.
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Restrict the table to one status.
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub(crate) filter: StatusFilter,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Analysis identifier.
    pub(crate) id: String,
    /// Write the decoded image preview to this path.
    #[arg(long)]
    pub(crate) save_preview: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DeleteArgs {
    /// Analysis identifier.
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct ConditionShowArgs {
    /// Diagnosis label (e.g. "Creeping Eruption") or condition code.
    pub(crate) label: String,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum StatusFilter {
    #[default]
    All,
    Urgent,
    Pending,
    Reviewed,
}

impl StatusFilter {
    pub(crate) fn admits(self, tier: dermai_conditions::SeverityTier) -> bool {
        use dermai_conditions::SeverityTier;
        match self {
            Self::All => true,
            Self::Urgent => tier == SeverityTier::Urgent,
            Self::Pending => tier == SeverityTier::Pending,
            Self::Reviewed => tier == SeverityTier::Reviewed,
        }
    }
}
