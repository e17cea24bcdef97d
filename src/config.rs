//! Runtime configuration for one feed-generation run.
//!
//! The pipeline never reads the environment itself; `main` builds a
//! [`FeedConfig`] from the CLI/env layer in [`crate::cli`] and passes it in.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Everything a single run needs to know.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Listing URL for page 1. Later pages add `?page=N`.
    pub base_url: Url,
    /// Upper bound on listing pages requested.
    pub max_pages: usize,
    /// Cap on items in the written feed. `None` keeps all.
    pub max_items: Option<usize>,
    /// Where the feed file lives. Replaced atomically every run.
    pub output_path: PathBuf,
    /// Upper bound on one page request, connect through body.
    pub request_timeout: Duration,
    /// Pause between consecutive page requests.
    pub page_delay: Duration,
    /// Channel `<title>`.
    pub feed_title: String,
    /// Channel `<description>`.
    pub feed_description: String,
    /// Channel `<language>`, e.g. `en-us`.
    pub feed_language: String,
}
