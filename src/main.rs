//! Link-Trawler main entry point
//!
//! This is the command-line interface for the Link-Trawler crawler.

use anyhow::{bail, Context};
use clap::Parser;
use link_trawler::config::{load_config, validate, Config};
use link_trawler::output::{print_report, print_statistics};
use link_trawler::url::{extract_domain, normalize_url, DomainPolicy};
use link_trawler::Crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Link-Trawler: a polite, bounded-concurrency web crawler
///
/// Crawls every resource reachable from the seed URL whose host is within the
/// allow-list, then prints each discovered URL in sorted order.
#[derive(Parser, Debug)]
#[command(name = "link-trawler")]
#[command(version)]
#[command(about = "A polite, bounded-concurrency web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED", env = "START_URL")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host allowed for traversal, subdomains included (repeatable)
    #[arg(
        short = 'd',
        long = "allowed-domain",
        value_name = "DOMAIN",
        env = "ALLOWED_DOMAINS",
        value_delimiter = ','
    )]
    allowed_domains: Vec<String>,

    /// Maximum number of pages fetched at the same time
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print redirect targets and errors under each URL
    #[arg(long)]
    details: bool,

    /// Print per-status statistics after the report
    #[arg(long)]
    stats: bool,

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

    let config = resolve_config(&cli)?;
    let seed = config
        .start_url
        .clone()
        .context("No seed URL given (pass SEED, set START_URL, or start-url in the config file)")?;

    let crawler = Crawler::from_config(&config).context("Failed to set up the crawler")?;
    crawler.crawl(&seed).await;

    let links = crawler.registry().snapshot();
    print_report(&links, config.output.include_details).context("Failed to write report")?;

    let stats = crawler.statistics();
    tracing::info!(
        "{} fetched, {} redirected, {} errored, {} leaf resources (peak concurrency {})",
        stats.fetched,
        stats.redirected,
        stats.errored,
        stats.leaves,
        crawler.peak_concurrency()
    );
    if cli.stats {
        println!();
        print_statistics(&stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_trawler=info,warn"),
            1 => EnvFilter::new("link_trawler=debug,info"),
            2 => EnvFilter::new("link_trawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers command-line flags and environment variables over the config file
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(seed) = &cli.seed {
        config.start_url = Some(seed.clone());
    }
    if !cli.allowed_domains.is_empty() {
        config.allowed_domains = cli.allowed_domains.clone();
    }
    if let Some(max_concurrency) = cli.max_concurrency {
        config.crawler.max_concurrency = max_concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }
    if cli.details {
        config.output.include_details = true;
    }

    // With no allow-list the library denies everything, so restrict the crawl
    // to the seed's own host instead.
    if DomainPolicy::new(&config.allowed_domains).is_empty() {
        if let Some(seed) = &config.start_url {
            let seed_url = normalize_url(seed).with_context(|| format!("Invalid seed URL {}", seed))?;
            let Some(host) = extract_domain(&seed_url) else {
                bail!("Seed URL {} has no host", seed);
            };
            tracing::info!("No allowed domains given, restricting crawl to {}", host);
            config.allowed_domains = vec![host];
        }
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}
