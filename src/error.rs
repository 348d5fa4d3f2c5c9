use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Murmur's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// A timestamp-ordering violation detected while rendering a subtitle format.
///
/// Formatters re-check segment timing even though [`crate::segments::Segment::new`]
/// validates at construction, because segments can also be built from raw fields
/// (tests, external adapters). The index is 1-based, matching the cue number the
/// offending segment would have received.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("segment {index}: end timestamp {end_seconds}s precedes start timestamp {start_seconds}s")]
pub struct FormatError {
    pub index: usize,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

/// Murmur's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// A segment violated the `0 <= start < end` timing invariant at construction.
    #[error(
        "malformed segment: timestamps {start_seconds}s -> {end_seconds}s violate 0 <= start < end"
    )]
    MalformedSegment {
        start_seconds: f64,
        end_seconds: f64,
    },

    /// A formatter rejected a segment it was asked to render.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Two inputs would write to the same output files.
    #[error("inputs '{}' and '{}' both map to output stem '{stem}'", .first.display(), .second.display())]
    DuplicateOutputTarget {
        first: PathBuf,
        second: PathBuf,
        stem: String,
    },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Other(Box::new(err))
    }
}
