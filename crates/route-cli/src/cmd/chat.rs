use super::open;
use crate::output::print_json;
use anyhow::Context;
use route_companion::{AnthropicClient, ChatSession, CompletionClient, Outcome, RouteClient};
use route_core::context::{self, ChatContext};
use std::path::Path;

/// One question, one answer. The workspace's tasks, projects and clients go
/// along as context. With `server`, the question goes to a running
/// `route serve` instead of straight to the completion API.
pub fn run(root: &Path, message: &str, server: Option<&str>, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let ctx = context::build(&ws.store)?;
    let cfg = &ws.config.companion;
    match server {
        Some(url) => {
            let session = ChatSession::from_config(RouteClient::new(url), cfg);
            converse(session, message, ctx, json)
        }
        None => {
            let client = AnthropicClient::from_env(cfg).context("the companion needs an API key")?;
            converse(ChatSession::from_config(client, cfg), message, ctx, json)
        }
    }
}

fn converse<C: CompletionClient>(
    session: ChatSession<C>,
    message: &str,
    ctx: ChatContext,
    json: bool,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(ask(&session, message, ctx))?;

    if json {
        return print_json(&serde_json::json!({
            "outcome": outcome_name(&outcome),
            "text": outcome.reply(),
            "transcript": session.transcript(),
        }));
    }
    if let Some(reply) = outcome.reply() {
        println!("{reply}");
    }
    match outcome {
        Outcome::Failed(reason) => anyhow::bail!("companion request failed: {reason}"),
        Outcome::TimedOut => anyhow::bail!("companion request timed out"),
        Outcome::Answered(_) | Outcome::Cancelled => Ok(()),
    }
}

async fn ask<C: CompletionClient>(
    session: &ChatSession<C>,
    message: &str,
    ctx: ChatContext,
) -> anyhow::Result<Outcome> {
    tokio::select! {
        outcome = session.send(message, ctx) => Ok(outcome?),
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            Ok(Outcome::Cancelled)
        }
    }
}

fn outcome_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Answered(_) => "answered",
        Outcome::Failed(_) => "failed",
        Outcome::TimedOut => "timed_out",
        Outcome::Cancelled => "cancelled",
    }
}
