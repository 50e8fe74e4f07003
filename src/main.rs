use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedwatch::app::AppContext;
use feedwatch::cli::{commands, Cli, Commands};
use feedwatch::config::Config;
use feedwatch::render::{Catalog, TerminalRenderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Commands::Watch {
        poll_interval_ms: Some(ms),
        ..
    } = &cli.command
    {
        config.poll_interval_ms = *ms;
    }

    let catalog = Catalog::new(config.locale);
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Watch { urls, .. } => {
            ctx.store.subscribe(TerminalRenderer::stdout(catalog));
            commands::watch(&ctx, &urls).await?;
        }
        Commands::Check { url, json } => {
            if !json {
                ctx.store.subscribe(TerminalRenderer::stdout(catalog));
            }
            commands::check(&ctx, &url, json).await?;
        }
    }

    Ok(())
}
