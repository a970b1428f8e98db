use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flatfeed::app::AppContext;
use flatfeed::cli::{commands, Cli, Commands, ConfigAction};
use flatfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Commands::Config {
        action: ConfigAction::Path,
    } = cli.command
    {
        commands::config_path()?;
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(api) = cli.api {
        config.api.base_url = api;
    }
    let page_size = cli.page_size.unwrap_or(config.feed.page_size);
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::List { query, pages, json } => {
            commands::list_items(&ctx, page_size, query.as_deref(), pages, json).await?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
