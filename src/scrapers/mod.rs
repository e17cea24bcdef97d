//! Site-specific listing markup.
//!
//! The source site's HTML is not under our control and changes without
//! notice. All knowledge of its structure sits behind [`ListingMarkup`], so a
//! redesign means touching one implementation and its fixtures.
//!
//! | Site | Module | Listing |
//! |------|--------|---------|
//! | Mercer TAAP | [`mercer`] | HR View content, paginated with `?page=N` |

use crate::error::BlockError;
use crate::models::RawArticle;

pub mod mercer;

/// Turns one listing page into raw article tuples, in document order.
///
/// Implementations must be stateless: the same instance is reused for every
/// page of a run. A block that cannot be read yields an `Err` for that block
/// only; the rest of the page still comes through.
///
/// The page is scanned eagerly: the parsed document borrows the HTML, so the
/// tuples are collected before it is dropped. Turning tuples into records is
/// the lazy step, see [`crate::extract::Extractor::extract`].
pub trait ListingMarkup {
    fn raw_articles(&self, html: &str) -> Vec<Result<RawArticle, BlockError>>;
}
