use serde::Serialize;

use crate::error::{Error, Result};

/// One recognized utterance: a time range plus the text spoken in it.
///
/// Timestamps are floating-point seconds from the start of the audio. The cue
/// index is *not* part of a segment; it is assigned by the formatters at
/// rendering time so that dropping or reordering upstream can never bake a
/// stale number into the data.
///
/// Fields are public so encoders and tests can work with raw values. Code that
/// produces segments from an ASR backend should go through [`Segment::new`],
/// which enforces the `0 <= start < end` timing invariant.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    /// Start of the utterance, in seconds.
    #[serde(rename = "start")]
    pub start_seconds: f64,

    /// End of the utterance, in seconds.
    #[serde(rename = "end")]
    pub end_seconds: f64,

    /// The recognized text. May carry leading/trailing whitespace; subtitle
    /// formats trim it at emission time, JSON preserves it verbatim.
    pub text: String,

    /// Mean log-probability of the segment's tokens, when the backend
    /// provides one. Carried through to JSON output only.
    pub avg_log_prob: Option<f64>,
}

impl Segment {
    /// Construct a validated segment.
    ///
    /// Fails with [`Error::MalformedSegment`] unless both timestamps are
    /// finite and `0 <= start < end`.
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Result<Self> {
        let ordered = start_seconds.is_finite()
            && end_seconds.is_finite()
            && start_seconds >= 0.0
            && start_seconds < end_seconds;

        if !ordered {
            return Err(Error::MalformedSegment {
                start_seconds,
                end_seconds,
            });
        }

        Ok(Self {
            start_seconds,
            end_seconds,
            text: text.into(),
            avg_log_prob: None,
        })
    }

    /// Attach a confidence score to a validated segment.
    pub fn with_avg_log_prob(mut self, avg_log_prob: f64) -> Self {
        self.avg_log_prob = Some(avg_log_prob);
        self
    }

    /// The segment text with surrounding whitespace removed, as emitted by
    /// the TXT/SRT/VTT formatters.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}
