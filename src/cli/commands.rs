use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::app::controller::{self, add_source, open_item, submit};
use crate::app::{AppContext, FeedwatchError, Result};
use crate::domain::ItemId;

/// What a line typed into `watch` asks for.
#[derive(Debug, PartialEq)]
enum Input {
    Open(String),
    Address(String),
}

fn parse_line(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.strip_prefix("open ") {
        Some(id) => Some(Input::Open(id.trim().to_string())),
        None => Some(Input::Address(line.to_string())),
    }
}

pub async fn watch(ctx: &AppContext, urls: &[String]) -> Result<()> {
    for url in urls {
        // Failures are already reported through the store
        let _ = add_source(ctx, url).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(ctx, &line).await,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                ctx.stop_polling();
                return Ok(());
            }
        }
    }

    if ctx.is_polling() {
        info!("Input closed, polling until interrupted");
        tokio::signal::ctrl_c().await?;
    }
    ctx.stop_polling();
    Ok(())
}

async fn handle_line(ctx: &AppContext, line: &str) {
    match parse_line(line) {
        Some(Input::Open(raw)) => {
            let result = raw
                .parse::<ItemId>()
                .map_err(|e| FeedwatchError::ItemNotFound(format!("{}: {}", raw, e)))
                .and_then(|id| open_item(ctx, id));
            if let Err(e) = result {
                warn!("{}", e);
            }
        }
        Some(Input::Address(address)) => {
            let _ = add_source(ctx, &address).await;
        }
        None => {}
    }
}

/// Fetch one feed without polling. Fails if the feed could not be added.
pub async fn check(ctx: &AppContext, url: &str, json: bool) -> Result<()> {
    let outcome = submit(ctx, url).await;

    if json {
        let state = ctx.store.snapshot();
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    match outcome {
        Ok(_) => Ok(()),
        Err(e) => {
            let code = ctx.store.read(controller::current_error);
            Err(FeedwatchError::Other(format!(
                "{} ({})",
                e,
                code.map(|c| c.key()).unwrap_or("unknown")
            )))
        }
    }
}
