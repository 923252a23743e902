//! cladder-stats - rung and query_type statistics for the cladder dataset
//!
//! A CLI tool that streams the cladder JSONL dataset once and prints the
//! distribution of causal ladder rungs, query types, and their joint counts.
//!
//! Exit codes:
//!   0 - Success (report printed)
//!   1 - Fatal error (dataset missing, unreadable input, bad config, etc.)

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use dataset::DatasetLocator;
use error::StatsError;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so the config can raise verbosity
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config)?;

    debug!("cladder-stats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    if let Err(e) = run(&config) {
        if let Some(stats_error) = e.downcast_ref::<StatsError>() {
            if stats_error.is_environment() {
                error!("Run from the project root or pass --root <DIR>");
            }
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .cladder-stats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml()?;
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report. `RUST_LOG`
/// overrides the level chosen from flags and config.
fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let level = args.log_level(config.general.verbose);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Locate the dataset, aggregate it, and print the report.
fn run(config: &Config) -> Result<()> {
    let start_time = Instant::now();

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let locator = DatasetLocator::new(config.project_root(&cwd));
    info!("Project root: {}", locator.root().display());

    // The file is checked before any aggregation begins
    let reader = locator.open()?;
    let report = analysis::aggregate(reader)
        .with_context(|| format!("Failed to aggregate {}", locator.path().display()))?;
    report.check_invariants()?;

    if report.parse_failures > 0 {
        info!(
            "{} of {} lines could not be parsed and were skipped",
            report.parse_failures, report.total
        );
    }
    debug!(
        "Aggregation finished in {:.3}s",
        start_time.elapsed().as_secs_f64()
    );

    print!("{}", report::render(&report));
    Ok(())
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        // Try explicit config path
        Some(ref config_path) => Config::load(config_path)?,
        // Try default location
        None => Config::load_default()?.unwrap_or_default(),
    };

    config.merge_with_args(args);
    Ok(config)
}
