//! Media-Harvest main entry point
//!
//! This is the command-line interface for the Media-Harvest media crawler.

use anyhow::{bail, Context};
use clap::Parser;
use media_harvest::config::{load_config_with_hash, Config};
use media_harvest::output::{print_aggregate, print_history, to_json, CrawlAggregate};
use media_harvest::storage::{open_history, CrawlHistory, SqliteHistory};
use media_harvest::{run_crawl, CrawlRequest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Number of entries shown by --history
const HISTORY_LIMIT: usize = 20;

/// Media-Harvest: download the media a web page links to
///
/// Media-Harvest fetches a page, finds media links with pattern heuristics,
/// downloads every file with a known media extension, and can follow
/// same-origin pages for one more round. Small files and duplicates are
/// removed from the save directory afterwards.
#[derive(Parser, Debug)]
#[command(name = "media-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Download the media a web page links to", long_about = None)]
struct Cli {
    /// Page to harvest
    #[arg(value_name = "URL", required_unless_present = "history")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to save into (default: derived from the URL)
    #[arg(short = 'o', long, value_name = "DIR")]
    save_path: Option<PathBuf>,

    /// Delete downloaded files smaller than KB * 1000 bytes
    #[arg(short, long, value_name = "KB")]
    min_size_kb: Option<u64>,

    /// Follow same-origin links that lack a media extension
    #[arg(short, long)]
    nested: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print recent crawl history and exit
    #[arg(long, conflicts_with = "url")]
    history: bool,

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

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.history {
        return handle_history(&config);
    }

    let Some(url) = cli.url.clone() else {
        bail!("a URL is required");
    };

    handle_crawl(&config, &cli, url).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("media_harvest=info,warn"),
            1 => EnvFilter::new("media_harvest=debug,info"),
            2 => EnvFilter::new("media_harvest=trace,debug"),
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

/// Handles the --history mode: lists recent crawls from the database
fn handle_history(config: &Config) -> anyhow::Result<()> {
    let Some(path) = &config.output.database_path else {
        bail!("no database-path configured; crawl history is disabled");
    };

    let history = open_history(path)
        .with_context(|| format!("failed to open history at {}", path.display()))?;
    let records = history.recent(HISTORY_LIMIT)?;

    print_history(&records);
    Ok(())
}

/// Opens the history store if one is configured
///
/// A store that cannot be opened disables history for this run.
fn history_for(config: &Config) -> Option<SqliteHistory> {
    let path = config.output.database_path.as_ref()?;

    match open_history(path) {
        Ok(history) => Some(history),
        Err(e) => {
            tracing::warn!("History disabled, cannot open {}: {}", path.display(), e);
            None
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, cli: &Cli, url: String) -> anyhow::Result<()> {
    let save_path = cli
        .save_path
        .clone()
        .unwrap_or_else(|| config.output.save_path_for(&url));

    let request = CrawlRequest::new(url, save_path)
        .with_min_size_kb(cli.min_size_kb.unwrap_or(config.output.min_size_kb))
        .with_nested(cli.nested);

    let mut history = history_for(config);
    let request_id = history.as_mut().and_then(|h| match h.record_request(&request) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!("Failed to record crawl request: {}", e);
            None
        }
    });

    let result = run_crawl(config, &request).await;

    if let (Some(history), Some(id)) = (history.as_mut(), request_id) {
        let recorded = match &result {
            Ok(aggregate) => history.record_result(id, aggregate),
            Err(e) => history.record_failure(id, &e.to_string()),
        };
        if let Err(e) = recorded {
            tracing::warn!("Failed to record crawl result: {}", e);
        }
    }

    let aggregate = result.with_context(|| format!("crawl of {} failed", request.url))?;
    report(&aggregate, cli)
}

fn report(aggregate: &CrawlAggregate, cli: &Cli) -> anyhow::Result<()> {
    if cli.json {
        println!("{}", to_json(aggregate)?);
    } else if !cli.quiet {
        print_aggregate(aggregate, cli.verbose > 0);
    }
    Ok(())
}
