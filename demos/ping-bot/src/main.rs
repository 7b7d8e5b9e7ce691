//! Ping Bot Example
//!
//! Reads omnibot payloads as newline-delimited JSON from stdin, dispatches
//! each one and prints the response envelope as a JSON line on stdout.
//!
//! # Usage
//!
//! ```bash
//! echo '{"omnibot_payload_type":"message","match_type":"command","args":"ping"}' \
//!     | cargo run --package ping-bot
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use omnibot::prelude::*;
use omnibot::runtime::OmnibotConfig;
use omnibot::runtime::config::LogOutput;
use serde_json::{Value, json};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "ping-bot", about = "Answers pings from omnibot payloads on stdin")]
struct Args {
    /// Configuration file; searched for in the usual places if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile.
    #[arg(short, long)]
    profile: Option<String>,

    /// Print the generated help and exit.
    #[arg(long)]
    print_help: bool,
}

// ============================================================================
// Handlers
// ============================================================================

fn ping(_: &MessageEvent, _: &RouteParams) -> Response {
    simple_post_message("pong").into()
}

fn find_user(_: &MessageEvent, params: &RouteParams) -> Response {
    let user = params.get("user").unwrap_or_default();
    SimplePostMessage::new(format!("Looking for <@{user}>"))
        .omnibot_parse(json!({"text": ["users"]}))
        .build()
        .into()
}

fn ping_button(event: &InteractiveEvent) -> Response {
    let user = event
        .get("user")
        .and_then(|user| user.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("someone");
    SimpleReply::new(format!("{user} pressed pong"))
        .replace_original(true)
        .build()
        .into()
}

fn build_router(config: &OmnibotConfig) -> RouterResult<OmnibotRouter> {
    let mut message_router = config.router.message_router();
    message_router.register_with_help(
        "ping",
        MatchType::Command,
        "Responds to pings with pongs",
        ping,
    )?;
    message_router.register_with_help(
        "find <user>",
        MatchType::Command,
        "Mentions the given user",
        find_user,
    )?;
    message_router.register_with_help(
        ".*ping.*",
        MatchType::Regex,
        "Responds to messages of pings with pongs",
        ping,
    )?;
    message_router.register("table_tennis", MatchType::Reaction, ping)?;

    let mut interactive_router = InteractiveRouter::new();
    interactive_router.register_scoped("ping_callback", "block_actions", ping_button)?;
    interactive_router.set_default(|event: &InteractiveEvent| {
        warn!(callback_id = ?event.callback_id, "Unhandled interactive component");
        simple_reply("Sorry, that button no longer works.").into()
    })?;

    Ok(OmnibotRouter::new()
        .with_message_router(message_router)
        .with_interactive_router(interactive_router))
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }
    let mut config = loader.load().context("failed to load configuration")?;

    // stdout carries the responses
    if config.logging.output == LogOutput::Stdout {
        config.logging.output = LogOutput::Stderr;
    }
    LoggingBuilder::from_config(&config.logging).init();

    let router = build_router(&config).context("failed to register routes")?;

    let mut stdout = io::stdout().lock();
    if args.print_help {
        if let Some(message_router) = router.message_router() {
            let help = Value::from(message_router.render_help());
            writeln!(stdout, "{help}")?;
        }
        return Ok(());
    }

    info!("Reading payloads from stdin");
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let payload: Value = match serde_json::from_str(&line) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Skipping line that is not JSON");
                continue;
            }
        };

        match router.dispatch(&payload) {
            Ok(response) => writeln!(stdout, "{}", Value::from(response))?,
            Err(e) => {
                error!(error = %e, "Failed to dispatch payload");
                writeln!(stdout, "{}", json!({"error": e.to_string()}))?;
            }
        }
    }

    Ok(())
}
