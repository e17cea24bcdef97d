//! Command-line and environment configuration.
//!
//! Every option has a default and an environment variable, so the binary can
//! be started with no arguments from a scheduler. Flags exist mostly for
//! manual runs.

use crate::config::FeedConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Command-line arguments for the feed generator.
///
/// # Examples
///
/// ```sh
/// # Scheduled run, everything from defaults/env
/// hr_view_feed
///
/// # Manual run writing somewhere else
/// FEED_MAX_PAGES=5 hr_view_feed --output-path public/feed.xml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing page URL (page 1)
    #[arg(
        long,
        env = "FEED_BASE_URL",
        default_value = "https://taap.mercer.com/en-us/resources/hr-view-content/"
    )]
    pub base_url: Url,

    /// Maximum number of listing pages to crawl
    #[arg(long, env = "FEED_MAX_PAGES", default_value_t = 3)]
    pub max_pages: usize,

    /// Maximum number of items kept in the feed (all when unset)
    #[arg(long, env = "FEED_MAX_ITEMS")]
    pub max_items: Option<usize>,

    /// Path of the generated feed file
    #[arg(short, long, env = "FEED_OUTPUT_PATH", default_value = "mercer_feed.xml")]
    pub output_path: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = "FEED_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Delay between page requests in milliseconds
    #[arg(long, env = "FEED_PAGE_DELAY_MS", default_value_t = 1000)]
    pub page_delay_ms: u64,

    /// Channel title
    #[arg(long, env = "FEED_TITLE", default_value = "Mercer TAAP Blog")]
    pub title: String,

    /// Channel description
    #[arg(
        long,
        env = "FEED_DESCRIPTION",
        default_value = "Latest HR articles, alerts, and legislative updates from Mercer TAAP"
    )]
    pub description: String,

    /// Channel language
    #[arg(long, env = "FEED_LANGUAGE", default_value = "en-us")]
    pub language: String,
}

impl Cli {
    pub fn into_config(self) -> FeedConfig {
        FeedConfig {
            base_url: self.base_url,
            max_pages: self.max_pages,
            max_items: self.max_items,
            output_path: self.output_path,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            page_delay: Duration::from_millis(self.page_delay_ms),
            feed_title: self.title,
            feed_description: self.description,
            feed_language: self.language,
        }
    }
}
