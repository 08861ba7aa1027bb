use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsdigest_core::DigestConfig;

mod commands;

#[derive(Parser)]
#[command(name = "newsdigest")]
#[command(author, version, about = "Collect recent, relevant news from RSS/Atom feeds")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file (default: ~/.config/newsdigest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all feeds and print the matching items
    Collect {
        /// Only keep items published within this many hours (default from config)
        #[arg(long)]
        hours: Option<u32>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List configured categories and feeds
    Sources,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(DigestConfig::default_path);
    let config = DigestConfig::load(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;

    // Initialize logging; stdout is reserved for collected output
    let default_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(default_level),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::debug!("Loaded configuration from {}", config_path.display());

    match cli.command {
        Some(Commands::Collect { hours, format }) => {
            let hours = hours.unwrap_or(config.general.hours_back);
            commands::collect::run(&config, hours, format).await
        }
        None => {
            let hours = config.general.hours_back;
            commands::collect::run(&config, hours, OutputFormat::Text).await
        }
        Some(Commands::Sources) => commands::sources::run(&config),
    }
}
