//! Error types for abstract parsing and the scrape pipeline.

use thiserror::Error;

/// Failure while splitting an abstract into label/value fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbstractError {
    /// A segment had no `": "` separating its label from its value.
    #[error("article {identifier}: segment {index} has no \": \" delimiter ({preview:?})")]
    MalformedSegment {
        identifier: String,
        index: usize,
        preview: String,
    },
}

/// Fatal pipeline failures. Anything recoverable is logged and absorbed
/// before it reaches this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("listing page {url} could not be fetched")]
    ListingUnavailable { url: String },

    #[error(transparent)]
    Abstract(#[from] AbstractError),

    #[error("failed to encode {file}: {source}")]
    Encode {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
