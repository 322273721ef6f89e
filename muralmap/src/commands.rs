use crate::CLAP_STYLING;
use clap::{arg, command};
use muralmap_core::config::{DEFAULT_LISTING_URL, DEFAULT_SUPPLEMENTARY_PATH};
use url::Url;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Flags shared by `serve` and `scrape`; both run the same pipeline.
fn pipeline_args() -> Vec<clap::Arg> {
    vec![
        arg!(--"listing-url" <URL>)
            .required(false)
            .help("The wiki page carrying the mural map layer")
            .env("MURALMAP_LISTING_URL")
            .value_parser(clap::value_parser!(Url))
            .default_value(DEFAULT_LISTING_URL),
        arg!(--"extra-murals" <PATH>)
            .required(false)
            .help("CSV of hand-curated murals merged after the scraped ones (skipped if missing)")
            .env("MURALMAP_EXTRA_MURALS")
            .default_value(DEFAULT_SUPPLEMENTARY_PATH),
        arg!(--"delay-ms" <MILLIS>)
            .required(false)
            .help("Minimum delay between requests to the wiki")
            .value_parser(clap::value_parser!(u64))
            .default_value("500"),
        arg!(--"timeout-secs" <SECONDS>)
            .required(false)
            .help("Per-request timeout in seconds")
            .value_parser(clap::value_parser!(u64).range(1..))
            .default_value("10"),
        arg!(--"limit" <N>)
            .required(false)
            .help("Only fetch detail pages for the first N murals")
            .value_parser(clap::value_parser!(usize)),
    ]
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("muralmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("muralmap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about("Serve the mural map as GeoJSON over HTTP. Every request re-scrapes the wiki.")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to bind the HTTP server to (host:port)")
                        .env("MURALMAP_BIND")
                        .default_value(DEFAULT_BIND),
                )
                .args(pipeline_args()),
        )
        .subcommand(
            command!("scrape")
                .about("Scrape the wiki once and write the GeoJSON FeatureCollection")
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write to file (default: stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .args(pipeline_args()),
        )
}
