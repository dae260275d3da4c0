//! Abstract dialects and the text splitter.
//!
//! Abstracts on WCRJ detail pages are loosely structured as `Label: value`
//! segments, but the separator between segments differs from article to
//! article. A [`DialectTable`] maps article identifiers to a [`SplitRule`];
//! [`split_abstract`] applies the rule to the abstract text.
//!
//! # Built-in dialects
//!
//! | Identifier | Rule | Segment separator |
//! |------------|------|-------------------|
//! | `1636` | [`SplitRule::NoSplit`] | none, only `"key"` is recorded |
//! | `1852` | [`SplitRule::SingleNewline`] | `"\n"` |
//! | `2157` | [`SplitRule::TripleNewline`] | `"\n\n\n"`, inner newlines removed |
//! | anything else | [`SplitRule::DoubleNewline`] | `"\n\n"` |

use crate::errors::AbstractError;
use crate::models::AbstractRecord;
use crate::utils::truncate_for_log;
use clap::ValueEnum;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// How an abstract's text is cut into `Label: value` segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// The abstract has no label structure; nothing beyond `"key"` is recorded.
    NoSplit,
    SingleNewline,
    DoubleNewline,
    /// Segments are separated by two blank lines and may wrap internally.
    /// Newlines inside a label or value are removed.
    TripleNewline,
}

impl SplitRule {
    fn separator(self) -> Option<&'static str> {
        match self {
            SplitRule::NoSplit => None,
            SplitRule::SingleNewline => Some("\n"),
            SplitRule::DoubleNewline => Some("\n\n"),
            SplitRule::TripleNewline => Some("\n\n\n"),
        }
    }

    fn clean(self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            SplitRule::TripleNewline => trimmed.replace('\n', ""),
            _ => trimmed.to_string(),
        }
    }
}

impl fmt::Display for SplitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitRule::NoSplit => "no-split",
            SplitRule::SingleNewline => "single-newline",
            SplitRule::DoubleNewline => "double-newline",
            SplitRule::TripleNewline => "triple-newline",
        };
        f.write_str(name)
    }
}

impl FromStr for SplitRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-split" | "none" => Ok(SplitRule::NoSplit),
            "single-newline" | "single" => Ok(SplitRule::SingleNewline),
            "double-newline" | "double" => Ok(SplitRule::DoubleNewline),
            "triple-newline" | "triple" => Ok(SplitRule::TripleNewline),
            other => Err(format!(
                "unknown split rule {other:?} (expected no-split, single-newline, double-newline or triple-newline)"
            )),
        }
    }
}

/// What to do with a segment that has no `": "` delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MalformedPolicy {
    /// Fail the article and stop the whole run.
    Abort,
    /// Drop the offending segment and keep the rest of the abstract.
    SkipSegment,
    /// Replace the article's fields with a `parse_error` entry and continue.
    #[default]
    Isolate,
}

/// Maps article identifiers to the [`SplitRule`] for their abstract.
///
/// Exact identifiers are checked first, then patterns in registration order,
/// then the fallback rule ([`SplitRule::DoubleNewline`]).
#[derive(Debug, Clone)]
pub struct DialectTable {
    exact: HashMap<String, SplitRule>,
    patterns: Vec<(Regex, SplitRule)>,
    fallback: SplitRule,
}

impl DialectTable {
    /// A table with no entries; every identifier gets the fallback rule.
    pub fn empty() -> Self {
        Self {
            exact: HashMap::new(),
            patterns: Vec::new(),
            fallback: SplitRule::DoubleNewline,
        }
    }

    pub fn insert(&mut self, identifier: impl Into<String>, rule: SplitRule) {
        self.exact.insert(identifier.into(), rule);
    }

    /// Register a regular expression. It is tested with `is_match`, so anchor
    /// it when the whole identifier must match.
    pub fn insert_pattern(&mut self, pattern: Regex, rule: SplitRule) {
        self.patterns.push((pattern, rule));
    }

    pub fn rule_for(&self, identifier: &str) -> SplitRule {
        if let Some(rule) = self.exact.get(identifier) {
            return *rule;
        }
        self.patterns
            .iter()
            .find(|(pattern, _)| pattern.is_match(identifier))
            .map(|(_, rule)| *rule)
            .unwrap_or(self.fallback)
    }
}

impl Default for DialectTable {
    /// The dialects known to occur on the haematological-oncology listing.
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("1636", SplitRule::NoSplit);
        table.insert("1852", SplitRule::SingleNewline);
        table.insert("2157", SplitRule::TripleNewline);
        table
    }
}

/// Parse a `--dialect` value of the form `IDENTIFIER=RULE`.
pub fn parse_dialect_entry(s: &str) -> Result<(String, SplitRule), String> {
    let (identifier, rule) = s
        .split_once('=')
        .ok_or_else(|| format!("expected IDENTIFIER=RULE, got {s:?}"))?;
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(format!("empty identifier in {s:?}"));
    }
    Ok((identifier.to_string(), rule.parse()?))
}

/// Parse a `--dialect-pattern` value of the form `REGEX=RULE`. The last `=`
/// separates the rule, so the pattern itself may contain `=`.
pub fn parse_dialect_pattern(s: &str) -> Result<(Regex, SplitRule), String> {
    let (pattern, rule) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected REGEX=RULE, got {s:?}"))?;
    let pattern = Regex::new(pattern).map_err(|e| e.to_string())?;
    Ok((pattern, rule.parse()?))
}

/// Split abstract text into a record under `rule`.
///
/// `text` should already be trimmed. The record always starts with
/// `"key" => identifier`; later duplicate labels overwrite earlier ones.
pub fn split_abstract(
    text: &str,
    identifier: &str,
    rule: SplitRule,
    policy: MalformedPolicy,
) -> Result<AbstractRecord, AbstractError> {
    let mut record = AbstractRecord::for_identifier(identifier);
    let Some(separator) = rule.separator() else {
        debug!(%identifier, "Abstract dialect has no label structure; recording key only");
        return Ok(record);
    };

    for (index, segment) in text.split(separator).enumerate() {
        let Some((label, value)) = segment.split_once(": ") else {
            let err = AbstractError::MalformedSegment {
                identifier: identifier.to_string(),
                index,
                preview: truncate_for_log(segment, 80),
            };
            match policy {
                MalformedPolicy::Abort => return Err(err),
                MalformedPolicy::SkipSegment => {
                    warn!(error = %err, "Dropping malformed abstract segment");
                    continue;
                }
                MalformedPolicy::Isolate => {
                    warn!(error = %err, "Abstract could not be parsed; recording parse_error");
                    let mut isolated = AbstractRecord::for_identifier(identifier);
                    isolated.insert(AbstractRecord::PARSE_ERROR, err.to_string());
                    return Ok(isolated);
                }
            }
        };
        record.insert(rule.clean(label), rule.clean(value));
    }

    debug!(%identifier, %rule, fields = record.len(), "Split abstract");
    Ok(record)
}
