//! Linktrawl main entry point
//!
//! This is the command-line interface for the Linktrawl single-host crawler.

use anyhow::Context;
use clap::Parser;
use linktrawl::config::{default_config, load_config_with_hash, Config};
use linktrawl::crawler::crawl;
use linktrawl::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Linktrawl: a single-host concurrent link crawler
///
/// Linktrawl starts at a seed URL, follows every link on the same origin,
/// and appends each link it observes to a plain-text link log.
#[derive(Parser, Debug)]
#[command(name = "linktrawl")]
#[command(version = "1.0.0")]
#[command(about = "A single-host concurrent link crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            default_config()?
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linktrawl=info,warn"),
            1 => EnvFilter::new("linktrawl=debug,info"),
            2 => EnvFilter::new("linktrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Linktrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Fetch workers: {}", config.crawler.fetch_workers);
    println!("  Extraction workers: {}", config.crawler.extraction_workers);
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }

    println!("\nOutput:");
    println!("  Link log: {}", config.output.link_log_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} with {} fetch workers and {} extraction workers",
        config.crawler.seed_url,
        config.crawler.fetch_workers,
        config.crawler.extraction_workers
    );
    tracing::info!("Recording links to {}", config.output.link_log_path);

    match crawl(config).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
