//! # HR View Feed
//!
//! Scrapes the Mercer TAAP "HR View" listing pages and publishes the articles
//! found there as an RSS 2.0 feed.
//!
//! ## Usage
//!
//! ```sh
//! # One full run with defaults; meant to be started by cron or CI
//! hr_view_feed
//!
//! # Override through the environment
//! FEED_MAX_PAGES=5 FEED_OUTPUT_PATH=public/feed.xml hr_view_feed
//! ```
//!
//! ## Architecture
//!
//! A single sequential pass:
//! 1. **Fetching**: request listing pages one at a time until the page limit,
//!    an empty page, or a failed request
//! 2. **Extraction**: read article blocks out of each page
//! 3. **Feed**: dedupe by link, sort newest first, write RSS atomically
//!
//! The feed file is the only state. It is rebuilt from scratch every run, so
//! articles that drop off the listing also drop out of the feed.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use fetcher::HttpPageSource;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hr_view_feed starting up");

    let config = Cli::parse().into_config();
    debug!(?config, "Loaded configuration");

    let source = HttpPageSource::new(config.base_url.clone(), config.request_timeout)?;

    let report = match pipeline::run(&config, &source, Utc::now()).await {
        Ok(report) => report,
        Err(e) => {
            error!(
                path = %config.output_path.display(),
                error = %e,
                "Feed was not written; previous file left in place"
            );
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        pages = report.pages_fetched,
        extracted = report.records_extracted,
        items = report.items_written,
        path = %report.output_path.display(),
        ?elapsed,
        "Execution complete"
    );

    Ok(())
}
