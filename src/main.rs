//! Podium main entry point
//!
//! This is the command-line interface for the Podium medal scraper.

use clap::{Parser, ValueEnum};
use podium::config::{load_or_default, Config};
use podium::crawler::{scrape, Mode};
use podium::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Podium: an Olympic medal scraper
///
/// Podium walks the athlete, nation or sport directory of
/// olympics-statistics.com through a rotating proxy pool and writes the
/// collected medal counts as JSON.
#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(version)]
#[command(about = "An Olympic medal scraper", long_about = None)]
struct Cli {
    /// Which data set to collect
    #[arg(value_enum, value_name = "MODE")]
    mode: CliMode,

    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliMode {
    /// Every athlete page, aggregated per country and per sport
    Athletes,
    /// Medal totals per nation
    Nations,
    /// Medal counts per country per sport
    Sports,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Athletes => Mode::Athletes,
            CliMode::Nations => Mode::Nations,
            CliMode::Sports => Mode::Sports,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(cfg) => {
            match &cli.config {
                Some(path) => tracing::info!("Configuration loaded from: {}", path.display()),
                None => tracing::info!("No config file given, using defaults"),
            }
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let mode = Mode::from(cli.mode);

    if cli.dry_run {
        handle_dry_run(&config, mode);
        return Ok(());
    }

    handle_scrape(config, mode, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("podium=info,warn"),
            1 => EnvFilter::new("podium=debug,info"),
            2 => EnvFilter::new("podium=trace,debug"),
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
fn handle_dry_run(config: &Config, mode: Mode) {
    println!("=== Podium Dry Run ({}) ===\n", mode);

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    match mode {
        Mode::Athletes => println!("  Letter pages: {}", config.site.letters.len()),
        Mode::Nations => println!("  Nation directory: {}", config.site.nations_url()),
        Mode::Sports => println!("  Sport directory: {}", config.site.sports_url()),
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Workers: {}", config.http.workers);
    println!("  Attempts per page: {}", config.http.max_attempts);
    println!("  Request timeout: {}s", config.http.request_timeout_secs);
    println!("  Retry delay: {}ms", config.http.retry_delay_ms);

    println!("\nProxies:");
    println!("  List: {}", config.proxy.file);
    println!("  Probe URL: {}", config.probe_url());

    println!("\nOutput:");
    println!("  {}", mode.output_path(&config.output));

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: Config,
    mode: Mode,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match scrape(config, mode).await {
        Ok(report) => {
            if !quiet {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
