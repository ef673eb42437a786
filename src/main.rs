//! Ripple-Rank main entry point
//!
//! This is the command-line interface for the Ripple-Rank prioritized crawler.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use ripple_rank::config::{load_config_with_hash, Config};
use ripple_rank::crawler::{run_crawl, StopHandle};
use ripple_rank::output::{print_statistics, session_id};
use ripple_rank::scoring::discovery_breakdown;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Rank: a prioritized web crawler
///
/// Ripple-Rank always fetches the most promising known URL next, scoring
/// discovered links by domain rules, keywords, URL path hints, per-domain
/// fairness and depth. Pages are written as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "ripple-rank")]
#[command(version)]
#[command(about = "A prioritized web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "explain")]
    dry_run: bool,

    /// Print the discovery-time score breakdown of a URL and exit
    #[arg(long, value_name = "URL")]
    explain: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if let Some(url) = &cli.explain {
        handle_explain(&config, url);
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_rank=info,warn"),
            1 => EnvFilter::new("ripple_rank=debug,info"),
            2 => EnvFilter::new("ripple_rank=trace,debug"),
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

/// Handles the --dry-run mode: shows the validated config and seeds
fn handle_dry_run(config: &Config) {
    println!("=== Ripple-Rank Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    match config.crawler.max_pages_per_domain {
        Some(max) => println!("  Max pages per domain: {}", max),
        None => println!("  Max pages per domain: unlimited"),
    }
    match config.crawler.max_depth {
        Some(max) => println!("  Max depth: {}", max),
        None => println!("  Max depth: unlimited"),
    }
    println!("  Content dedup: {}", config.crawler.dedupe_content);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    let scoring = &config.scoring;
    println!("\nScoring:");
    println!("  Priority retention: {}", scoring.priority_retention);
    println!("  Fairness curve: {:?}", scoring.fairness);
    if let Some(floor) = scoring.score_floor {
        println!("  Score floor: {}", floor);
    }
    for (title, table) in [
        ("Priority rules", &scoring.priority_rules),
        ("Keyword weights", &scoring.keyword_weights),
        ("Content-type weights", &scoring.content_type_weights),
    ] {
        println!("  {} ({}):", title, table.len());
        for (key, weight) in table {
            println!("    - {} = {}", key, weight);
        }
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {} (priority {})", seed.url, seed.priority);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --explain mode: scores a URL against an empty crawl history
fn handle_explain(config: &Config, url: &str) {
    let breakdown = discovery_breakdown(url, &config.scoring);

    println!("=== Score for {} ===\n", url);
    println!(
        "  Domain:        {}",
        breakdown.domain.as_deref().unwrap_or("(unparseable)")
    );
    println!(
        "  Domain rule:   {:>8.3}  {}",
        breakdown.domain_rule,
        breakdown.matched_rule.as_deref().unwrap_or("(no match)")
    );
    println!("  Keywords:      {:>8.3}  (needs page content)", breakdown.keyword);
    println!("  Content type:  {:>8.3}", breakdown.content_type);
    println!("  Fairness:      {:>8.3}", breakdown.fairness);
    println!("  Depth penalty: {:>8.3}", breakdown.depth_penalty);
    println!("  ----------------------");
    if breakdown.raw_total != breakdown.total {
        println!("  Raw total:     {:>8.3}", breakdown.raw_total);
    }
    println!("  Total:         {:>8.3}", breakdown.total);
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let session = session_id(config_hash, Utc::now());
    tracing::info!("Starting crawl session {}", session);
    tracing::info!("Total seed URLs: {}", config.seeds.len());

    let stop = StopHandle::new();
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            signal_stop.stop();
        }
    });

    let report = run_crawl(config, &session, stop)
        .await
        .context("Crawl failed")?;

    print_statistics(&report);
    Ok(())
}
