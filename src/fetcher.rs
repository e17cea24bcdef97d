//! Listing page retrieval.
//!
//! [`PageSource`] is the seam between the pipeline and the network. The
//! production implementation, [`HttpPageSource`], issues exactly one GET per
//! call and never retries; the next scheduled run is the retry.

use crate::error::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Result of asking for one listing page.
#[derive(Debug)]
pub enum PageFetch {
    /// The page exists and has a body.
    Html(String),
    /// The site has no such page (404/410 or an empty body).
    Exhausted,
    /// Network error, timeout or an unexpected status.
    Failed(FetchError),
}

/// Something that can hand out listing pages by 1-based index.
pub trait PageSource {
    async fn fetch_page(&self, page: usize) -> PageFetch;
}

/// URL for listing page `page`: the base URL for page 1, `?page=N` after that.
pub fn page_url(base: &Url, page: usize) -> Url {
    let mut url = base.clone();
    if page > 1 {
        url.query_pairs_mut().append_pair("page", &page.to_string());
    }
    url
}

/// Fetches listing pages over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    base_url: Url,
}

impl HttpPageSource {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    async fn get(&self, url: Url) -> Result<Option<String>, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        Ok(Some(body))
    }
}

impl PageSource for HttpPageSource {
    #[instrument(level = "info", skip(self))]
    async fn fetch_page(&self, page: usize) -> PageFetch {
        let url = page_url(&self.base_url, page);
        info!(%url, "Fetching listing page");

        match self.get(url.clone()).await {
            Ok(Some(body)) if !body.trim().is_empty() => {
                debug!(%url, bytes = body.len(), "Fetched listing page");
                PageFetch::Html(body)
            }
            Ok(_) => {
                info!(%url, "Listing page has no content");
                PageFetch::Exhausted
            }
            Err(e) => {
                warn!(%url, error = %e, "Listing page fetch failed");
                PageFetch::Failed(e)
            }
        }
    }
}
