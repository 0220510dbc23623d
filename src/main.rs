//! skinmap main entry point
//!
//! This is the command-line interface for the skinmap skin page crawler.

use anyhow::Context;
use clap::Parser;
use skinmap::config::{load_config_with_hash, Config};
use skinmap::output::{print_statistics, CacheStatistics};
use skinmap::{CacheStore, Coordinator, JsonStore, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// skinmap: builds a per-item skin configuration from skin pages
///
/// The first run discovers every skin page from the index page. Each run then
/// fetches only the pages not resolved yet, saves progress to the cache, and
/// regenerates the skin configuration. Ctrl-C stops after the current page.
#[derive(Parser, Debug)]
#[command(name = "skinmap")]
#[command(version)]
#[command(about = "Builds a skin configuration from skin pages", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Delete the source list first so skin pages are discovered again
    #[arg(long, conflicts_with_all = ["export_only", "stats", "dry_run"])]
    rediscover: bool,

    /// Regenerate the skin configuration from the cache without fetching
    #[arg(long, conflicts_with_all = ["stats", "dry_run"])]
    export_only: bool,

    /// Show statistics from the cache and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Show the effective configuration and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    exit_code(&run(cli).await)
}

/// Logs a failed run once and maps it to the process exit status
fn exit_code(result: &anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            tracing::error!(
                "Something went wrong. Please open an issue with the error reported above."
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load(cli.config.as_ref())?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_only {
        Coordinator::from_config(config)?.export()?;
    } else {
        handle_crawl(config, cli.rediscover).await?;
    }

    Ok(())
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("skinmap=info,warn"),
            1 => EnvFilter::new("skinmap=debug,info"),
            2 => EnvFilter::new("skinmap=trace,debug"),
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
    println!("=== skinmap Dry Run ===\n");

    println!("Files:");
    println!("  Source list: {}", config.paths.source_list.display());
    println!("  Cache: {}", config.paths.cache.display());
    println!("  Output: {}", config.paths.output.display());

    println!("\nFetcher:");
    println!("  Index URL: {}", config.fetcher.index_url);
    println!("  Request timeout: {}s", config.fetcher.request_timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nSelectors:");
    println!("  Index link: {}", config.selectors.index_link);
    println!("  Workshop id: {}", config.selectors.workshop_id);
    println!("  Item image: {}", config.selectors.item_image);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the cache
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Cache: {}\n", config.paths.cache.display());

    let store = JsonStore::from_config(&config.paths);
    let cache = store.load_cache()?;

    print_statistics(&CacheStatistics::from_cache(&cache));

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, rediscover: bool) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?;

    if rediscover {
        tracing::info!("Removing the source list so skin pages are discovered again");
        coordinator.store().remove_source_list()?;
    }

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Stopping the crawler...");
            signal_token.cancel();
        }
    });

    match coordinator.run(&token).await? {
        RunOutcome::UpToDate { records } => {
            tracing::info!("Nothing to fetch; {} cached items", records);
        }
        RunOutcome::Completed(outcome) => {
            tracing::info!("Crawl completed: {} pages processed", outcome.processed);
        }
        RunOutcome::Cancelled(outcome) => {
            tracing::info!(
                "Crawl interrupted after {} pages; the cache is saved",
                outcome.processed
            );
        }
    }

    Ok(())
}
