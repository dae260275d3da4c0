//! Page fetching.
//!
//! [`FetchPage`] is the seam between the pipeline and the network. The
//! production implementation, [`PageFetcher`], issues one GET per call on a
//! shared `reqwest` client and never retries. Failures are logged here and
//! surface to callers only as `None`.

use scraper::Html;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Default request timeout, matching what the journal site needs on slow pages.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(50);

/// Fetch a URL and parse it as an HTML document.
///
/// Implementors must not return errors: a page that cannot be retrieved is
/// reported as `None` after being logged.
pub trait FetchPage {
    async fn fetch(&self, url: &str) -> Option<Html>;
}

/// HTTP implementation of [`FetchPage`] backed by a single pooled client.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_text(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl FetchPage for PageFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Option<Html> {
        match self.fetch_text(url).await {
            Ok(body) => {
                debug!(bytes = body.len(), "Fetched page");
                Some(Html::parse_document(&body))
            }
            Err(e) => {
                error!(%url, error = %e, "Failed to fetch page");
                None
            }
        }
    }
}
