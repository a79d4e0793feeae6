use std::path::PathBuf;

use thiserror::Error;

use crate::types::PiiType;

/// Errors raised by the masking engine
#[derive(Error, Debug)]
pub enum MaskError {
    #[error("pattern for {pii_type} failed to compile: {source}")]
    Pattern {
        pii_type: PiiType,
        #[source]
        source: regex::Error,
    },

    #[error("entity span {start}..{end} is out of bounds for text of {len} characters")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("entity span {start}..{end} is empty or inverted")]
    EmptySpan { start: usize, end: usize },

    #[error("entity span {start}..{end} overlaps or precedes the previous entity ending at {previous_end}")]
    OverlappingSpans {
        start: usize,
        end: usize,
        previous_end: usize,
    },
}

/// Errors raised while loading a classifier artifact
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classifier artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read classifier artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse classifier artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid classifier artifact: {0}")]
    Invalid(String),
}
