use crate::Result;
use crate::segments::Segment;

/// Streaming interface shared by every output format.
///
/// Encoders receive segments in input order, one at a time, and must never
/// reorder them. `close()` finalizes the output (e.g. the closing `]` of a
/// JSON array, or the `WEBVTT` header when no cue was ever written) and is
/// idempotent.
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &Segment) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
