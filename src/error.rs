//! Error types for each stage of the pipeline.
//!
//! Only [`FeedError`] ever reaches `main`. Fetch and block errors are absorbed
//! and logged by the stage that sees them.

use reqwest::StatusCode;
use thiserror::Error;

/// A listing page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
}

/// One article block on a listing page could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("article link {href:?} is not a valid URL: {reason}")]
    BadLink { href: String, reason: String },
    #[error("article link {0:?} does not use http(s)")]
    UnsupportedScheme(String),
}

/// The feed document could not be produced or written.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("first listing page could not be fetched: {0}")]
    NothingFetched(#[source] FetchError),
    #[error("failed to serialize feed: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("failed to write feed: {0}")]
    Io(#[from] std::io::Error),
}
