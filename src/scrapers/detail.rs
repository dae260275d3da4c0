//! Article detail page parser.
//!
//! The abstract lives in the first element with class `abstract-single`.
//! Its text is handed to [`split_abstract`] with the rule the
//! [`DialectTable`] picks for the article identifier.

use crate::dialects::{split_abstract, DialectTable, MalformedPolicy};
use crate::errors::AbstractError;
use crate::models::AbstractRecord;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

static ABSTRACT: Lazy<Selector> = Lazy::new(|| Selector::parse(".abstract-single").unwrap());

/// Extract the abstract of one detail page.
///
/// A page without an abstract section yields an empty record; that is a
/// per-article miss, not an error. Malformed segments are handled according
/// to `policy`, and only [`MalformedPolicy::Abort`] returns `Err`.
#[instrument(level = "info", skip(document, dialects))]
pub fn parse_abstract(
    document: &Html,
    identifier: &str,
    dialects: &DialectTable,
    policy: MalformedPolicy,
) -> Result<AbstractRecord, AbstractError> {
    let Some(section) = document.select(&ABSTRACT).next() else {
        warn!(%identifier, "No abstract found");
        return Ok(AbstractRecord::default());
    };

    let text = section.text().collect::<String>();
    let rule = dialects.rule_for(identifier);
    let record = split_abstract(text.trim(), identifier, rule, policy)?;
    info!(%identifier, %rule, fields = record.len(), "Parsed abstract");
    Ok(record)
}
