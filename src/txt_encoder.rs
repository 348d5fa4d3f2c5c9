use std::io::Write;

use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// A `SegmentEncoder` that writes one trimmed line of text per segment.
///
/// No numbering, no timestamps, no validation: plain text has nothing to get
/// wrong about timing, so even a segment with inverted timestamps still
/// renders. A segment whose trimmed text is empty still produces its (empty)
/// line, so line count always equals segment count.
pub struct TxtEncoder<W: Write> {
    w: W,
    closed: bool,
}

impl<W: Write> TxtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self { w, closed: false }
    }
}

impl<W: Write> SegmentEncoder for TxtEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        writeln!(&mut self.w, "{}", seg.trimmed_text())?;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start_seconds: start,
            end_seconds: end,
            text: text.to_string(),
            avg_log_prob: None,
        }
    }

    #[test]
    fn txt_close_without_segments_emits_nothing() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "");
        Ok(())
    }

    #[test]
    fn txt_trims_and_writes_one_line_per_segment() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);

        enc.write_segment(&seg(0.0, 1.5, " hello "))?;
        enc.write_segment(&seg(1.5, 3.2, "world"))?;
        enc.close()?;

        assert_eq!(std::str::from_utf8(&out)?, "hello\nworld\n");
        Ok(())
    }

    #[test]
    fn txt_keeps_empty_lines_for_whitespace_only_segments() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);

        enc.write_segment(&seg(0.0, 1.0, "   "))?;
        enc.write_segment(&seg(1.0, 2.0, "after"))?;
        enc.close()?;

        assert_eq!(std::str::from_utf8(&out)?, "\nafter\n");
        Ok(())
    }

    #[test]
    fn txt_ignores_inverted_timestamps() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);
        enc.write_segment(&seg(5.0, 4.0, "bad"))?;
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "bad\n");
        Ok(())
    }

    #[test]
    fn txt_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TxtEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_segment(&seg(0.0, 1.0, "nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
