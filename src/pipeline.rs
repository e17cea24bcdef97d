//! One fetch → extract → build → write cycle.
//!
//! Pages are requested strictly one after another. Pagination ends at the
//! page limit, at the first page that is missing or has no articles, or at
//! the first failed fetch. Whatever was collected up to that point goes into
//! the feed.
//!
//! A failed fetch of page 1 is the exception: nothing was learned about the
//! site, so the run fails and the previous feed file stays in place.

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::extract::Extractor;
use crate::fetcher::{PageFetch, PageSource};
use crate::outputs::rss::{build_document, write_feed};
use crate::scrapers::mercer::MercerListing;
use crate::utils::truncate_for_log;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub pages_fetched: usize,
    pub records_extracted: usize,
    pub items_written: usize,
    pub output_path: PathBuf,
}

/// Run the whole pipeline once and write the feed.
///
/// # Arguments
///
/// * `config` - Page limit, item cap, output path and channel metadata
/// * `source` - Where listing pages come from
/// * `run_started` - The feed's `lastBuildDate`, and the date given to
///   articles that show none
///
/// # Returns
///
/// A [`RunReport`] once the feed file has been replaced.
///
/// # Errors
///
/// - [`FeedError::NothingFetched`] when page 1 fails to fetch; no file is written
/// - [`FeedError::Io`] / [`FeedError::Xml`] when the feed cannot be written
#[instrument(level = "info", skip_all, fields(max_pages = config.max_pages))]
pub async fn run<S: PageSource>(
    config: &FeedConfig,
    source: &S,
    run_started: DateTime<Utc>,
) -> Result<RunReport, FeedError> {
    let extractor = Extractor::new(MercerListing::new(config.base_url.clone()), run_started);
    let mut records = Vec::new();
    let mut pages_fetched = 0;

    for page in 1..=config.max_pages {
        if page > 1 && !config.page_delay.is_zero() {
            sleep(config.page_delay).await;
        }

        let html = match source.fetch_page(page).await {
            PageFetch::Html(html) => html,
            PageFetch::Exhausted => {
                info!(page, "No more listing pages");
                break;
            }
            PageFetch::Failed(e) if pages_fetched == 0 => {
                return Err(FeedError::NothingFetched(e));
            }
            PageFetch::Failed(e) => {
                warn!(page, error = %e, "Stopping pagination after failed fetch");
                break;
            }
        };
        pages_fetched += 1;

        let before = records.len();
        records.extend(extractor.extract(page, &html));
        let found = records.len() - before;
        info!(page, found, "Extracted articles from listing page");

        if found == 0 {
            debug!(page, preview = %truncate_for_log(&html, 200), "Empty listing page");
            break;
        }
    }

    let records_extracted = records.len();
    let document = build_document(config, records, run_started);
    let items_written = document.items.len();
    if items_written == 0 {
        warn!("No articles found; writing an empty feed");
    }

    write_feed(&document, &config.output_path).await?;

    Ok(RunReport {
        pages_fetched,
        records_extracted,
        items_written,
        output_path: config.output_path.clone(),
    })
}
