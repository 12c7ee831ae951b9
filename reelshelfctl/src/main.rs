use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelshelfctl::commands::{
    ingest::{self, IngestArgs},
    series::{self, SeriesCommand},
};
use reelshelfctl::config::{ConfigLoader, ConfigLoaderOptions};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "reelshelfctl", version)]
#[command(about = "Manage the Reelshelf catalog and run batch episode ingestion")]
struct Cli {
    /// Path to reelshelf.toml (defaults to ./reelshelf.toml or ./config/reelshelf.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create, list and inspect series
    #[command(subcommand)]
    Series(SeriesCommand),
    /// Submit a manifest of tagged items to a bounded or open ingestion job
    Ingest(IngestArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let load = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.config,
        env_file: cli.env_file,
    })
    .load()
    .context("failed to load configuration")?;

    for warning in &load.warnings.items {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }
    let config = load.config;
    if config.metadata.env_file_loaded {
        debug!("loaded .env file");
    }
    debug!(store = %config.store_path.display(), "configuration resolved");

    match cli.command {
        Command::Series(command) => series::run(&config, command).await,
        Command::Ingest(args) => ingest::run(&config, args).await,
    }
}
