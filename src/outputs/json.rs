//! JSON output files.
//!
//! ```text
//! output_dir/
//! ├── articles.json    # Vec<ArticleRecord>
//! └── abstracts.json   # Vec<AbstractRecord>, same order as articles.json
//! ```
//!
//! Files are pretty-printed with four-space indentation; non-ASCII text is
//! written as UTF-8, not escaped.

use crate::errors::PipelineError;
use crate::models::{AbstractRecord, ArticleRecord};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const ARTICLES_FILE: &str = "articles.json";
pub const ABSTRACTS_FILE: &str = "abstracts.json";

/// Write the listing records to `{output_dir}/articles.json`.
pub async fn write_articles(
    articles: &[ArticleRecord],
    output_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    write_json(articles, output_dir, ARTICLES_FILE).await
}

/// Write the parsed abstracts to `{output_dir}/abstracts.json`.
pub async fn write_abstracts(
    abstracts: &[AbstractRecord],
    output_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    write_json(abstracts, output_dir, ABSTRACTS_FILE).await
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %file))]
async fn write_json<T: Serialize + ?Sized>(
    value: &T,
    output_dir: &Path,
    file: &str,
) -> Result<PathBuf, PipelineError> {
    let json = to_pretty_json(value).map_err(|source| PipelineError::Encode {
        file: file.to_string(),
        source,
    })?;

    let path = output_dir.join(file);
    fs::write(&path, &json)
        .await
        .map_err(|source| PipelineError::Write {
            path: path.display().to_string(),
            source,
        })?;
    info!(path = %path.display(), bytes = json.len(), "Wrote JSON file");
    Ok(path)
}
