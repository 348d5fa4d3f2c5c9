use std::io::Write;

use crate::error::FormatError;
use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::timestamp::format_srt_timestamp;

/// A `SegmentEncoder` that writes segments in SRT format.
///
/// Each cue is a block of:
/// - a 1-based index line
/// - a timing line (`HH:MM:SS,mmm --> HH:MM:SS,mmm`)
/// - the trimmed text
/// - a blank separator line
///
/// The index counter lives here, not on the segment: numbering is a property
/// of the rendered file. A segment with `end < start` fails with
/// [`FormatError`] *before* any of its block is written, so a caller that
/// renders into a buffer and discards it on error returns no partial output.
pub struct SrtEncoder<W: Write> {
    w: W,

    /// Index assigned to the next cue (1-based).
    next_index: usize,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            next_index: 1,
            closed: false,
        }
    }
}

impl<W: Write> SegmentEncoder for SrtEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        let index = self.next_index;

        // Validate timing before emitting anything for this cue.
        if seg.end_seconds < seg.start_seconds {
            return Err(FormatError {
                index,
                start_seconds: seg.start_seconds,
                end_seconds: seg.end_seconds,
            }
            .into());
        }

        let start = format_srt_timestamp(seg.start_seconds);
        let end = format_srt_timestamp(seg.end_seconds);

        writeln!(&mut self.w, "{index}")?;
        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{}", seg.trimmed_text())?;
        writeln!(&mut self.w)?;

        self.next_index += 1;
        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}
