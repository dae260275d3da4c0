//! Command-line interface definitions.
//!
//! Every option has a default that reproduces a plain run against the
//! haematological-oncology topic, and most can also be set through a
//! `WCRJ_*` environment variable.

use crate::dialects::{parse_dialect_entry, parse_dialect_pattern, MalformedPolicy, SplitRule};
use crate::fetch::DEFAULT_TIMEOUT;
use crate::scrapers::listing::DEFAULT_CONTAINER;
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: haematological-oncology topic, ./output, one request at a time
/// wcrj_abstracts
///
/// # Another topic, four detail pages in flight, stop on the first malformed abstract
/// wcrj_abstracts --topic-url https://www.wcrj.net/topic/breast-cancer -c 4 --on-malformed abort
///
/// # Teach the parser a new abstract dialect
/// wcrj_abstracts --dialect 2290=single-newline --dialect-pattern '^23\d\d$=no-split'
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory for articles.json and abstracts.json (created if missing)
    #[arg(short, long, env = "WCRJ_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Topic listing page to scrape
    #[arg(
        long,
        env = "WCRJ_TOPIC_URL",
        default_value = "https://www.wcrj.net/topic/haematological-oncology"
    )]
    pub topic_url: url::Url,

    /// Base URL for article detail pages; the lowercased identifier is appended
    #[arg(long, env = "WCRJ_ARTICLE_BASE_URL", default_value = "https://www.wcrj.net/article")]
    pub article_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "WCRJ_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Maximum number of detail pages fetched at once (1 = strictly sequential)
    #[arg(short, long, env = "WCRJ_CONCURRENCY", default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=16))]
    pub concurrency: u16,

    /// What to do when an abstract segment has no "Label: value" delimiter
    #[arg(long, env = "WCRJ_ON_MALFORMED", value_enum, default_value_t = MalformedPolicy::Isolate)]
    pub on_malformed: MalformedPolicy,

    /// CSS selector for one article entry on the listing page
    #[arg(long, env = "WCRJ_CONTAINER_SELECTOR", default_value = DEFAULT_CONTAINER)]
    pub container_selector: String,

    /// Extra abstract dialect for one identifier, as IDENTIFIER=RULE
    /// (rules: no-split, single-newline, double-newline, triple-newline)
    #[arg(long = "dialect", value_name = "IDENTIFIER=RULE", value_parser = parse_dialect_entry)]
    pub dialects: Vec<(String, SplitRule)>,

    /// Extra abstract dialect for identifiers matching a regex, as REGEX=RULE
    #[arg(long = "dialect-pattern", value_name = "REGEX=RULE", value_parser = parse_dialect_pattern)]
    pub dialect_patterns: Vec<(Regex, SplitRule)>,

    /// User-Agent header sent with every request
    #[arg(
        long,
        env = "WCRJ_USER_AGENT",
        default_value = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
    )]
    pub user_agent: String,
}
