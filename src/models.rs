//! Data models shared by the scrape-to-feed pipeline.
//!
//! - [`RawArticle`]: field tuple lifted out of one listing block, before defaults
//! - [`ArticleRecord`]: a validated article ready to be placed in the feed
//! - [`FeedDocument`]: the channel plus its ordered items for one run

use chrono::{DateTime, Utc};
use url::Url;

/// Fields pulled from a single article block by a markup strategy.
///
/// Nothing here is validated beyond the link having resolved to an absolute
/// URL. The extractor decides what to do with missing pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    /// Absolute article URL, fragment removed.
    pub link: Url,
    /// Anchor text, whitespace collapsed. `None` when the anchor is empty.
    pub title: Option<String>,
    /// Date text exactly as the block presented it.
    pub published: Option<String>,
    /// Teaser text from the block, if any.
    pub summary: Option<String>,
}

/// One discovered article.
///
/// `link` is the identity key: within a run only the first record for a given
/// link survives into the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub title: String,
    pub link: Url,
    pub published_at: DateTime<Utc>,
    /// Empty when the listing block had no teaser.
    pub summary: String,
    /// 1-based listing page this record came from.
    pub page: usize,
}

impl ArticleRecord {
    /// Text used for the RSS `<description>` element.
    ///
    /// Falls back to the title so readers never show an empty teaser.
    pub fn description(&self) -> &str {
        if self.summary.is_empty() {
            &self.title
        } else {
            &self.summary
        }
    }
}

/// The feed produced by one run. Built from scratch every time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub title: String,
    pub description: String,
    pub site_link: Url,
    pub language: String,
    pub generator: String,
    /// Newest first; ties keep discovery order.
    pub items: Vec<ArticleRecord>,
    pub generated_at: DateTime<Utc>,
}
