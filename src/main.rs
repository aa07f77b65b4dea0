use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CrawlArgs;
use docharvest::config::Config;

#[derive(Parser)]
#[command(
    name = "docharvest",
    version,
    about = "Polite single-site documentation crawler that saves each page as Markdown",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the config file setting
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a documentation site into Markdown files
    Crawl {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Site root; only pages on this host are followed
        #[arg(long)]
        base_url: Option<String>,

        /// Seed path or URL, resolved against the base URL (repeatable)
        #[arg(short, long = "seed")]
        seeds: Vec<String>,

        /// Stop after this many saved pages
        #[arg(short, long)]
        max_pages: Option<usize>,

        /// Pause between pages in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Output directory for Markdown files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Language tag for unlabeled code blocks
        #[arg(long)]
        code_language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            config,
            base_url,
            seeds,
            max_pages,
            delay_ms,
            output,
            code_language,
        } => {
            let config = load_config(config.as_deref())?;
            let format = cli
                .log_format
                .as_deref()
                .unwrap_or(&config.logging.format)
                .to_string();
            setup_tracing(&format, &config.logging.level, cli.verbose)?;

            tracing::info!("docharvest starting");

            let args = CrawlArgs {
                base_url,
                seeds,
                max_pages,
                delay_ms,
                output,
                code_language,
            };
            commands::crawl(config, args).await?;
        }
    }

    tracing::info!("docharvest completed");
    Ok(())
}

/// Defaults or the given file, then environment overrides
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_env();
    Ok(config)
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("docharvest=debug,warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("docharvest={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}
