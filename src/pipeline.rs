//! Listing → abstracts scrape pipeline.
//!
//! 1. **Listing**: fetch the topic page and parse its article entries
//! 2. **Articles output**: write `articles.json` before any detail page is touched
//! 3. **Abstracts**: fetch each detail page and parse its abstract, in listing order
//! 4. **Abstracts output**: write `abstracts.json`
//!
//! Detail pages are fetched through an ordered buffer, so with a concurrency
//! above one the requests overlap but the output still follows the listing.

use crate::dialects::{DialectTable, MalformedPolicy};
use crate::errors::{AbstractError, PipelineError};
use crate::fetch::FetchPage;
use crate::models::{AbstractRecord, ArticleRecord};
use crate::outputs::json;
use crate::scrapers::{detail, listing};
use crate::utils::detail_url;
use futures::stream::{self, StreamExt, TryStreamExt};
use scraper::Selector;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Everything a run needs besides the fetcher.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Topic listing page.
    pub topic_url: Url,
    /// Detail pages live at `{article_base_url}/{identifier, lowercased}`.
    pub article_base_url: String,
    pub output_dir: PathBuf,
    /// Selector for one article entry on the listing page.
    pub container: Selector,
    pub dialects: DialectTable,
    pub policy: MalformedPolicy,
    /// Maximum detail pages in flight at once.
    pub concurrency: usize,
}

/// Counts reported at the end of a successful run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub articles: usize,
    /// Abstracts split into fields without error.
    pub parsed: usize,
    /// Articles whose page or abstract section was missing.
    pub missing: usize,
    /// Articles recorded with a `parse_error` entry.
    pub isolated: usize,
}

impl RunSummary {
    fn tally(articles: usize, abstracts: &[AbstractRecord]) -> Self {
        let mut summary = Self {
            articles,
            ..Self::default()
        };
        for record in abstracts {
            if record.is_empty() {
                summary.missing += 1;
            } else if record.get(AbstractRecord::PARSE_ERROR).is_some() {
                summary.isolated += 1;
            } else {
                summary.parsed += 1;
            }
        }
        summary
    }
}

/// Run the whole pipeline once.
///
/// # Errors
///
/// - [`PipelineError::ListingUnavailable`] if the topic page cannot be fetched
/// - [`PipelineError::Abstract`] if a segment is malformed under
///   [`MalformedPolicy::Abort`]; `articles.json` has been written by then
/// - [`PipelineError::Encode`] / [`PipelineError::Write`] on output failures
#[instrument(level = "info", skip_all, fields(topic = %config.topic_url))]
pub async fn run<F: FetchPage>(
    fetcher: &F,
    config: &PipelineConfig,
) -> Result<RunSummary, PipelineError> {
    let Some(page) = fetcher.fetch(config.topic_url.as_str()).await else {
        error!(url = %config.topic_url, "Failed to fetch the listing page; exiting");
        return Err(PipelineError::ListingUnavailable {
            url: config.topic_url.to_string(),
        });
    };
    let articles = listing::parse_listing(&page, &config.container, &config.topic_url);
    drop(page);

    json::write_articles(&articles, &config.output_dir).await?;

    let concurrency = config.concurrency.max(1);
    info!(count = articles.len(), concurrency, "Scraping abstracts");

    let abstracts: Vec<AbstractRecord> = stream::iter(articles.iter())
        .map(|article| scrape_abstract(fetcher, config, article))
        .buffered(concurrency)
        .try_collect::<Vec<_>>()
        .await
        .inspect_err(|e| error!(error = %e, "Aborting run on malformed abstract"))?;

    json::write_abstracts(&abstracts, &config.output_dir).await?;

    let summary = RunSummary::tally(articles.len(), &abstracts);
    info!(
        articles = summary.articles,
        parsed = summary.parsed,
        missing = summary.missing,
        isolated = summary.isolated,
        "Scrape complete"
    );
    Ok(summary)
}

/// Fetch and parse one article's abstract. A missing page or identifier
/// yields an empty record.
async fn scrape_abstract<F: FetchPage>(
    fetcher: &F,
    config: &PipelineConfig,
    article: &ArticleRecord,
) -> Result<AbstractRecord, AbstractError> {
    let Some(identifier) = article.identifier() else {
        warn!(heading = %article.heading, "Article has no identifier; skipping abstract");
        return Ok(AbstractRecord::default());
    };

    let url = detail_url(&config.article_base_url, identifier);
    let Some(document) = fetcher.fetch(&url).await else {
        warn!(%identifier, %url, "Detail page unavailable; recording empty abstract");
        return Ok(AbstractRecord::default());
    };

    debug!(%identifier, %url, "Fetched detail page");
    detail::parse_abstract(&document, identifier, &config.dialects, config.policy)
}
