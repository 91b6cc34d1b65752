//! MediaWiki-Crawl main entry point
//!
//! This is the command-line interface for the MediaWiki image harvester.

use anyhow::Context;
use clap::Parser;
use mediawiki_crawl::config::{load_config_with_hash, validate, validate_base_uri, Config};
use mediawiki_crawl::crawler::{build_api, ContinuationCrawler};
use mediawiki_crawl::download::{download_all, print_summary, DownloadSummary};
use mediawiki_crawl::CrawlError;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// MediaWiki-Crawl: download every image hosted on a MediaWiki site
///
/// Walks the wiki's `list=allimages` API listing page by page, pausing
/// between pages, and saves each asset into the output directory.
#[derive(Parser, Debug)]
#[command(name = "mediawiki-crawl")]
#[command(version)]
#[command(about = "Download every image hosted on a MediaWiki site", long_about = None)]
struct Cli {
    /// Base URI of the wiki (`/api.php` is appended when missing)
    #[arg(value_name = "BASE_URI")]
    base_uri: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listing offset to start from (overrides the config file)
    #[arg(long, value_name = "CURSOR")]
    from: Option<String>,

    /// Directory downloaded files are written to (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Print the listing instead of downloading assets
    #[arg(long)]
    list_only: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Validate inputs before touching the network
    let base_uri = validate_base_uri(cli.base_uri.as_deref())?;
    let config = load_effective_config(&cli)?;

    let api = build_api(base_uri.as_str(), &config)?;
    tracing::info!("Crawling {}", api.endpoint().api_url());

    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("Interrupt received, stopping after the current request");
        signal.cancel();

        // A second interrupt aborts without waiting for the request in flight
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::error!("Second interrupt received, aborting");
            std::process::exit(130);
        }
    });

    let mut crawler = api
        .all_images(&config.crawl.start_cursor)
        .with_cancellation(cancel);

    if cli.list_only {
        return finish(handle_list(&mut crawler).await);
    }

    let output_dir = Path::new(&config.output.directory);
    let mut summary = DownloadSummary::default();
    let result =
        download_all(&mut crawler, api.transport().as_ref(), output_dir, &mut summary).await;

    print_summary(&summary, Some(crawler.stats()));
    finish(result)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mediawiki_crawl=info,warn"),
            1 => EnvFilter::new("mediawiki_crawl=debug,info"),
            2 => EnvFilter::new("mediawiki_crawl=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(from) = &cli.from {
        config.crawl.start_cursor = from.clone();
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.display().to_string();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles --list-only: prints one line per record
async fn handle_list(crawler: &mut ContinuationCrawler) -> Result<(), CrawlError> {
    let mut count = 0u64;
    while let Some(image) = crawler.next_record().await? {
        count += 1;
        println!("{:<8}{}\n        {}", count, image.name, image.asset_url);
    }

    tracing::info!(
        "Listed {} images across {} pages",
        count,
        crawler.stats().pages_fetched
    );
    Ok(())
}

/// Maps the crawl result to the process result; an interrupt is not a failure
fn finish(result: Result<(), CrawlError>) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(CrawlError::Cancelled) => {
            tracing::warn!("Crawl interrupted");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
