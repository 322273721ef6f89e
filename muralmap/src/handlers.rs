use crate::server::{AppState, router};
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use muralmap_core::PipelineConfig;
use muralmap_core::scrape::{ScrapeOptions, execute_scrape, generate_scrape_summary};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Expand `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    Path::new(expanded.as_ref()).to_path_buf()
}

/// Build the pipeline configuration from the shared subcommand flags.
pub fn pipeline_config_from_args(args: &ArgMatches) -> PipelineConfig {
    let mut config = PipelineConfig::default();

    if let Some(listing_url) = args.get_one::<Url>("listing-url") {
        config = config.with_listing_url(listing_url.as_str());
    }
    if let Some(extra) = args.get_one::<String>("extra-murals") {
        config = config.with_supplementary_path(Some(expand_path(extra)));
    }
    if let Some(delay_ms) = args.get_one::<u64>("delay-ms") {
        config = config.with_request_delay(Duration::from_millis(*delay_ms));
    }
    if let Some(timeout_secs) = args.get_one::<u64>("timeout-secs") {
        config = config.with_fetch_timeout(Duration::from_secs(*timeout_secs));
    }

    config.with_max_enrichments(args.get_one::<usize>("limit").copied())
}

/// Logs go to stderr so `scrape` can write GeoJSON to stdout.
pub fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn print_banner() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!(
        "{}  {}",
        "  MURALMAP".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}", "  LocalWiki murals as GeoJSON".cyan());
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!();
}

pub async fn handle_serve(args: &ArgMatches) -> Result<()> {
    let config = pipeline_config_from_args(args);
    let bind = args
        .get_one::<String>("bind")
        .map(String::as_str)
        .unwrap_or(crate::commands::DEFAULT_BIND);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {}", bind))?;

    eprintln!(
        "{} Listing: {}",
        "→".blue(),
        config.listing_url.bright_white()
    );
    eprintln!(
        "{} Serving {} on {}",
        "✓".green().bold(),
        "/get_mural_data".bright_white(),
        format!("http://{}", addr).bright_white()
    );
    info!(%addr, listing = %config.listing_url, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, router(AppState::new(config)))
        .await
        .context("server shutdown")?;
    Ok(())
}

pub async fn handle_scrape(args: &ArgMatches, quiet: bool) -> Result<()> {
    let config = pipeline_config_from_args(args);
    let output = args.get_one::<PathBuf>("output");

    if !quiet {
        eprintln!(
            "{} Scraping {}",
            "→".blue(),
            config.listing_url.bright_white()
        );
    }

    let options = ScrapeOptions {
        config,
        show_progress_bars: !quiet,
    };
    let outcome = execute_scrape(options, None)
        .await
        .context("Scrape failed")?;

    let json = serde_json::to_string_pretty(&outcome.collection)
        .context("Failed to serialize FeatureCollection")?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} GeoJSON written to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => println!("{}", json),
    }

    if !quiet {
        eprint!("{}", generate_scrape_summary(&outcome.stats));
    }
    Ok(())
}
