//! Review-Trawler main entry point
//!
//! This is the command-line interface for the review-directory crawler.

use clap::{Parser, Subcommand};
use review_trawler::browser::{ChromiumSession, CrawlKind, RandomJitter};
use review_trawler::config::{load_config_with_hash, Config};
use review_trawler::crawler::{
    plan_indices, DiscoveryCrawler, Fetcher, ReviewCrawler, StartIndex,
};
use review_trawler::input::{load_categories, load_products};
use review_trawler::output::{CsvSink, PRODUCT_LINKS_HEADER};
use review_trawler::state::{CheckpointStore, FileCheckpointStore, Heartbeat, HeartbeatKind};
use review_trawler::ReviewRecord;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Review-Trawler: a resilient review-directory crawler
///
/// The discovery crawl walks category listings and collects product
/// review-page links; the review crawl walks those product pages and
/// extracts normalized review records. Both resume from their checkpoint
/// files after an interruption.
#[derive(Parser, Debug)]
#[command(name = "review-trawler")]
#[command(version = "1.0.0")]
#[command(about = "A resilient review-directory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl category listings and collect product review-page links
    Discover {
        /// Replay indices from the start index down to 0, without touching
        /// the checkpoint
        #[arg(long)]
        backward: bool,

        /// Start index (overrides the checkpoint); "half" starts at the
        /// middle of the category list
        #[arg(long, value_parser = parse_start_index)]
        start_index: Option<StartIndex>,
    },

    /// Crawl product pages and extract review records
    Reviews {
        /// Replay indices from the start index down to 0, without touching
        /// the checkpoint
        #[arg(long)]
        backward: bool,

        /// Start index (overrides the checkpoint)
        #[arg(long)]
        start_index: Option<usize>,
    },
}

fn parse_start_index(value: &str) -> Result<StartIndex, String> {
    if value.eq_ignore_ascii_case("half") {
        return Ok(StartIndex::Half);
    }
    value
        .parse()
        .map(StartIndex::Index)
        .map_err(|_| format!("expected an index or \"half\", got '{}'", value))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Discover {
            backward,
            start_index,
        } => handle_discover(config, backward, start_index).await?,
        Command::Reviews {
            backward,
            start_index,
        } => handle_reviews(config, backward, start_index).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("review_trawler=info,warn"),
            1 => EnvFilter::new("review_trawler=debug,info"),
            2 => EnvFilter::new("review_trawler=trace,debug"),
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

/// Handles the discovery crawl
async fn handle_discover(
    config: Config,
    backward: bool,
    start_index: Option<StartIndex>,
) -> Result<(), Box<dyn std::error::Error>> {
    let categories = load_categories(Path::new(&config.discovery.categories_path))?;

    let start = start_index.map(|s| match s {
        StartIndex::Index(i) => i,
        StartIndex::Half => categories.len() / 2,
    });

    let checkpoint = FileCheckpointStore::new(&config.discovery.checkpoint_path);
    let indices = plan_indices(categories.len(), checkpoint.resume_index(), start, backward);

    if indices.is_empty() {
        tracing::info!("Nothing left to discover");
        return Ok(());
    }

    // Only a forward run beginning at 0 is a fresh output file
    let fresh = !backward && indices[0] == 0;
    let sink = CsvSink::open(
        Path::new(&config.discovery.output_path),
        &PRODUCT_LINKS_HEADER,
        fresh,
    )?;
    let heartbeat = Heartbeat::new(&config.discovery.heartbeat_path, HeartbeatKind::Category);

    if backward {
        tracing::info!("Backward replay from index {} down to 0", indices[0]);
    } else {
        tracing::info!("Starting discovery crawl at index {}", indices[0]);
    }

    let session = ChromiumSession::launch(&config.browser).await?;
    let fetcher = Fetcher::new(
        session,
        RandomJitter,
        config.fetch.clone(),
        Duration::from_secs(config.browser.navigation_timeout_secs),
        CrawlKind::Discovery,
    );

    let origin = Url::parse(&config.site.origin)?;
    let mut crawler = DiscoveryCrawler::new(
        fetcher,
        checkpoint,
        heartbeat,
        sink,
        origin,
        config.site.reviews_path_prefix.clone(),
        Duration::from_secs(config.discovery.retry_base_secs),
        Duration::from_secs(config.discovery.retry_max_secs),
        !backward,
    );

    let result = crawler.run(&categories, &indices).await;
    crawler.into_fetcher().into_session().shutdown().await?;
    result?;

    Ok(())
}

/// Handles the review crawl
async fn handle_reviews(
    config: Config,
    backward: bool,
    start_index: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = load_products(Path::new(&config.reviews.products_path))?;

    let checkpoint = FileCheckpointStore::new(&config.reviews.checkpoint_path);
    let indices = plan_indices(
        products.len(),
        checkpoint.resume_index(),
        start_index,
        backward,
    );

    if indices.is_empty() {
        tracing::info!("Nothing left to crawl");
        return Ok(());
    }

    let fresh = !backward && indices[0] == 0;
    let sink = CsvSink::open(
        Path::new(&config.reviews.output_path),
        &ReviewRecord::HEADER,
        fresh,
    )?;
    let heartbeat = Heartbeat::new(&config.reviews.heartbeat_path, HeartbeatKind::Product);

    if backward {
        tracing::info!("Backward replay from index {} down to 0", indices[0]);
    } else {
        tracing::info!("Starting review crawl at index {}", indices[0]);
    }

    let session = ChromiumSession::launch(&config.browser).await?;
    let fetcher = Fetcher::new(
        session,
        RandomJitter,
        config.fetch.clone(),
        Duration::from_secs(config.browser.navigation_timeout_secs),
        CrawlKind::Reviews,
    );

    let mut crawler = ReviewCrawler::new(
        fetcher,
        checkpoint,
        heartbeat,
        sink,
        config.reviews.max_age_months(),
        !backward,
    );

    let result = crawler.run(&products, &indices).await;
    crawler.into_fetcher().into_session().shutdown().await?;
    result?;

    Ok(())
}
