//! # WCRJ Abstracts
//!
//! Scrapes a topic listing page of the World Cancer Research Journal,
//! records the metadata of every listed article, then visits each article's
//! detail page and splits its abstract into `Label: value` fields.
//!
//! ## Usage
//!
//! ```sh
//! wcrj_abstracts -o ./output
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: fetch the topic page, extract one record per article entry
//! 2. **Articles output**: write `articles.json`
//! 3. **Abstracts**: fetch each detail page and parse its abstract with the
//!    dialect chosen for the article identifier
//! 4. **Abstracts output**: write `abstracts.json`, in listing order

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod dialects;
mod errors;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use dialects::DialectTable;
use fetch::PageFetcher;
use pipeline::PipelineConfig;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("wcrj_abstracts starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Fail before any network traffic if the results cannot be saved.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let mut dialects = DialectTable::default();
    for (identifier, rule) in &args.dialects {
        info!(%identifier, %rule, "Registered abstract dialect");
        dialects.insert(identifier.clone(), *rule);
    }
    for (pattern, rule) in &args.dialect_patterns {
        info!(%pattern, %rule, "Registered abstract dialect pattern");
        dialects.insert_pattern(pattern.clone(), *rule);
    }

    let config = PipelineConfig {
        topic_url: args.topic_url.clone(),
        article_base_url: args.article_base_url.clone(),
        output_dir: args.output_dir.clone(),
        container: scrapers::listing::container_selector(&args.container_selector)?,
        dialects,
        policy: args.on_malformed,
        concurrency: usize::from(args.concurrency),
    };

    let fetcher = PageFetcher::new(Duration::from_secs(args.timeout_secs), &args.user_agent)?;
    let summary = pipeline::run(&fetcher, &config).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = summary.articles,
        parsed = summary.parsed,
        missing = summary.missing,
        isolated = summary.isolated,
        "Execution complete"
    );

    Ok(())
}
