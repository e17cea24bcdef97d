//! Turn listing HTML into [`ArticleRecord`]s.
//!
//! The markup strategy does the structural work; this module applies the
//! record rules on top:
//!
//! - no title: the block is dropped
//! - no usable date: the run's start time is used
//! - no summary: empty string
//! - unreadable block: logged and skipped, the rest of the page continues

use crate::models::{ArticleRecord, RawArticle};
use crate::scrapers::ListingMarkup;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// `3rd` -> `3`, so `March 3rd, 2025` parses like `March 3, 2025`.
static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})(st|nd|rd|th)\b").expect("static regex"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%m/%d/%Y"];

/// Stateless page extractor. One instance serves every page of a run.
#[derive(Debug, Clone)]
pub struct Extractor<M> {
    markup: M,
    now: DateTime<Utc>,
}

impl<M: ListingMarkup> Extractor<M> {
    /// Create an extractor around a markup strategy.
    ///
    /// # Arguments
    ///
    /// * `markup` - Site-specific strategy that reads article blocks
    /// * `now` - Timestamp given to articles without a usable date
    pub fn new(markup: M, now: DateTime<Utc>) -> Self {
        Self { markup, now }
    }

    /// Records found on listing page `page`, in document order.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based listing page index, stored on each record
    /// * `html` - Raw body of that page
    ///
    /// # Returns
    ///
    /// An iterator of valid [`ArticleRecord`]s. Blocks without a title or with
    /// unreadable markup are logged and left out. The conversion is lazy, and
    /// calling `extract` again on the same HTML yields the same sequence.
    pub fn extract<'a>(
        &'a self,
        page: usize,
        html: &str,
    ) -> impl Iterator<Item = ArticleRecord> + 'a {
        self.markup
            .raw_articles(html)
            .into_iter()
            .enumerate()
            .filter_map(move |(index, block)| match block {
                Ok(raw) => self.to_record(page, index, raw),
                Err(e) => {
                    warn!(page, index, error = %e, "Skipping unreadable article block");
                    None
                }
            })
    }

    fn to_record(&self, page: usize, index: usize, raw: RawArticle) -> Option<ArticleRecord> {
        let Some(title) = raw.title else {
            debug!(page, index, link = %raw.link, "Dropping article block without a title");
            return None;
        };

        let published_at = match raw.published.as_deref() {
            Some(text) => parse_published(text).unwrap_or_else(|| {
                warn!(page, index, date = text, "Unrecognised date; using run time");
                self.now
            }),
            None => {
                debug!(page, index, link = %raw.link, "No date on article; using run time");
                self.now
            }
        };

        Some(ArticleRecord {
            title,
            link: raw.link,
            published_at,
            summary: raw.summary.unwrap_or_default(),
            page,
        })
    }
}

/// Parse the date formats seen on listing pages.
///
/// Full timestamps keep their offset (normalised to UTC). Date-only values
/// are taken as midnight UTC.
///
/// # Returns
///
/// `None` when the text matches none of RFC 3339, RFC 2822, `2025-03-03`,
/// `March 3, 2025` (ordinals allowed), `Mar 3, 2025`, `3 March 2025` or
/// `03/03/2025`.
///
/// # Examples
///
/// ```ignore
/// assert!(parse_published("March 3rd, 2025").is_some());
/// assert!(parse_published("Updated recently").is_none());
/// ```
pub fn parse_published(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let cleaned = ORDINAL_SUFFIX.replace_all(text, "$1");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
