//! Mercer TAAP "HR View" listing markup.
//!
//! Articles are anchors pointing into `/apps/ppa/article/`. The block around
//! each anchor carries the teaser and, on most cards, a date:
//!
//! ```html
//! <div class="card">
//!   <h3><a href="/apps/ppa/article/12345/paid-leave">Paid leave update</a></h3>
//!   <time datetime="2025-03-03">March 3, 2025</time>
//!   <p>Three states changed their rules.</p>
//! </div>
//! ```
//!
//! Relative links are resolved against the listing base URL.

use super::ListingMarkup;
use crate::error::BlockError;
use crate::models::RawArticle;
use crate::utils::collapse_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

static ARTICLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="/apps/ppa/article/"]"#).expect("static selector"));
static DATETIME_ATTR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time[datetime]").expect("static selector"));
static DATE_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time, .date, .published").expect("static selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));
static DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.description").expect("static selector"));

/// Elements that wrap the anchor without being the card itself.
const WRAPPERS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "strong", "em", "b", "i",
];

/// Markup strategy for the Mercer TAAP listing.
#[derive(Debug, Clone)]
pub struct MercerListing {
    base_url: Url,
}

impl MercerListing {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    fn resolve(&self, href: &str) -> Result<Url, BlockError> {
        let href = href.trim();
        let mut url = self.base_url.join(href).map_err(|e| BlockError::BadLink {
            href: href.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BlockError::UnsupportedScheme(href.to_string()));
        }
        url.set_fragment(None);
        Ok(url)
    }

    fn read_block(&self, anchor: ElementRef<'_>) -> Result<RawArticle, BlockError> {
        let href = anchor.value().attr("href").unwrap_or_default();
        let link = self.resolve(href)?;
        let title = collapse_text(anchor.text());
        let block = enclosing_block(anchor, href);

        let published = block.and_then(|block| {
            block
                .select(&DATETIME_ATTR)
                .find_map(|el| el.value().attr("datetime"))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .or_else(|| block.select(&DATE_TEXT).find_map(|el| collapse_text(el.text())))
        });

        let summary = block.and_then(|block| {
            block
                .select(&PARAGRAPH)
                .chain(block.select(&DESCRIPTION))
                .filter_map(|el| collapse_text(el.text()))
                .find(|text| Some(text) != title.as_ref())
        });

        Ok(RawArticle {
            link,
            title,
            published,
            summary,
        })
    }
}

impl ListingMarkup for MercerListing {
    fn raw_articles(&self, html: &str) -> Vec<Result<RawArticle, BlockError>> {
        let document = Html::parse_document(html);
        let blocks: Vec<_> = document
            .select(&ARTICLE_LINK)
            .map(|anchor| self.read_block(anchor))
            .collect();
        debug!(blocks = blocks.len(), "Scanned Mercer listing markup");
        blocks
    }
}

/// The card that belongs to `anchor` alone.
///
/// Climbs past inline wrappers (headings, `p`, `span`, ...) to the first
/// container element, but never into an ancestor that also links to a
/// different article. On flat listings, where cards are not wrapped one per
/// element, that leaves the anchor's own wrapper (or nothing) as the block,
/// so one article never borrows a neighbour's date or teaser.
///
/// # Arguments
///
/// * `anchor` - The article link element
/// * `href` - The anchor's raw `href`, used to recognise links to the same article
///
/// # Returns
///
/// The enclosing block, or `None` when even the direct parent is shared.
fn enclosing_block<'a>(anchor: ElementRef<'a>, href: &str) -> Option<ElementRef<'a>> {
    let own = article_key(href);
    let mut block = None;
    for node in anchor.ancestors() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let shared = element
            .select(&ARTICLE_LINK)
            .filter_map(|a| a.value().attr("href"))
            .any(|other| article_key(other) != own);
        if shared {
            break;
        }
        block = Some(element);
        if !WRAPPERS.contains(&element.value().name()) {
            break;
        }
    }
    block
}

/// `href` without surrounding whitespace or fragment.
fn article_key(href: &str) -> &str {
    let href = href.trim();
    href.split('#').next().unwrap_or(href)
}
