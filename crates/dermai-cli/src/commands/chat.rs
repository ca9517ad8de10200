use std::sync::Arc;

use dermai_client::{ChatConnectivity, ChatLink};
use tracing::warn;

use crate::cli::{ChatSendArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_chat_history, render_chat_link, render_chat_reply};

const CHAT_UNAVAILABLE: &str = "Chat service unavailable";

async fn check_connectivity(ctx: &AppContext, max_attempts: u32) -> ChatLink {
    let handle = ChatConnectivity::new(
        Arc::new(ctx.client.clone()),
        ctx.settings.chat_retry_delay,
    )
    .with_metrics(ctx.metrics.clone())
    .spawn();
    handle.settle(max_attempts).await
}

pub(crate) async fn handle_chat_send(
    ctx: &AppContext,
    args: &ChatSendArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let message = args.message.join(" ");
    if message.trim().is_empty() {
        return Err(CliError::validation("message must not be empty"));
    }

    let link = check_connectivity(ctx, 1).await;
    if !link.connected {
        warn!(attempts = link.attempts, "chat service did not answer");
        return Err(CliError::failure(anyhow::anyhow!(CHAT_UNAVAILABLE)));
    }

    let reply = ctx.client.send_chat(&message).await?;
    render_chat_reply(&reply, format)
}

pub(crate) async fn handle_chat_status(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let link = check_connectivity(ctx, 2).await;
    render_chat_link(&link, format)
}

pub(crate) async fn handle_chat_history(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let messages = ctx.client.chat_history().await?;
    render_chat_history(&messages, format)
}

pub(crate) async fn handle_chat_clear(ctx: &AppContext) -> CliResult<()> {
    let response = ctx.client.clear_chat().await?;
    println!(
        "{}",
        response
            .message
            .as_deref()
            .unwrap_or("Chat history cleared")
    );
    Ok(())
}
