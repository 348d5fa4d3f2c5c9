use std::io::Write;

use serde::Serialize;

use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// A `SegmentEncoder` that writes segments as a single JSON array.
///
/// Design:
/// - We stream output directly to a `Write` implementation to avoid buffering
///   all segments in memory.
/// - The encoder is stateful so we can emit a well-formed JSON array
///   incrementally and assign each element its 1-based index.
/// - Timestamps are serialized at full `f64` precision and text verbatim
///   (untrimmed): JSON is the lossless format, the subtitle formats are the
///   display formats.
///
/// Example output:
/// ```json
/// [{"index":1,"start":0.0,"end":1.2,"text":" hello","avg_log_prob":-0.31}]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    w: W,

    /// Whether we have written the opening `[` of the JSON array.
    started: bool,

    /// Index assigned to the next element (1-based).
    next_index: usize,

    /// Whether the encoder has been closed.
    closed: bool,
}

/// One element of the output array: a segment plus its position.
#[derive(Serialize)]
struct IndexedSegment<'a> {
    index: usize,
    #[serde(flatten)]
    segment: &'a Segment,
}

impl<W: Write> JsonArrayEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            next_index: 1,
            closed: false,
        }
    }

    /// Write the opening `[` of the JSON array if we have not already done so.
    ///
    /// We defer writing the opening bracket so that:
    /// - Empty output still results in valid JSON (`[]`)
    /// - We do not emit partial output unless a segment is actually written
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for JsonArrayEncoder<W> {
    /// Serialize a single segment and append it to the JSON array.
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        // Write a comma before every element except the first.
        if self.next_index > 1 {
            self.w.write_all(b",")?;
        }

        let element = IndexedSegment {
            index: self.next_index,
            segment: seg,
        };
        serde_json::to_writer(&mut self.w, &element)?;

        self.next_index += 1;
        Ok(())
    }

    /// Finalize the JSON array and flush the underlying writer.
    ///
    /// This method is idempotent:
    /// - Calling `close()` multiple times is safe.
    /// - After closing, no further segments may be written.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        // Ensure we still output a valid JSON array even if no segments were written.
        self.start_if_needed()?;

        self.w.write_all(b"]")?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}
