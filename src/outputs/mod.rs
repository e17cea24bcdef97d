//! Feed output.
//!
//! - [`rss`]: builds the RSS 2.0 document and replaces the feed file
//!
//! # Output
//!
//! ```text
//! mercer_feed.xml          # the feed, replaced every run
//! .mercer_feed.xml.tmp     # only exists while a run is writing
//! ```

pub mod rss;
