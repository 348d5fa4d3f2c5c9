use std::io::Write;

use crate::error::FormatError;
use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::timestamp::format_vtt_timestamp;

/// A `SegmentEncoder` that writes segments in WebVTT format.
///
/// Design:
/// - The `WEBVTT` header is written lazily on the first cue, but `close()`
///   also emits it, so an empty transcript still produces a valid file.
/// - Cues carry no identifier line. WebVTT makes cue identifiers optional and
///   omitting them keeps output deterministic; numbering lives in SRT where
///   the format requires it.
/// - Timing is validated per cue with the same fail-fast [`FormatError`] as
///   SRT; we still track a cue counter purely so the error can name the
///   offending cue.
pub struct VttEncoder<W: Write> {
    w: W,

    /// Whether we've written the `WEBVTT` header.
    started: bool,

    /// 1-based number of the next cue, used only in error reporting.
    next_index: usize,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            next_index: 1,
            closed: false,
        }
    }

    /// Write the WebVTT header if we haven't written it yet.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            // WebVTT files begin with a mandatory header line followed by a blank line.
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for VttEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        // Validate timing before emitting anything for this cue.
        if seg.end_seconds < seg.start_seconds {
            return Err(FormatError {
                index: self.next_index,
                start_seconds: seg.start_seconds,
                end_seconds: seg.end_seconds,
            }
            .into());
        }

        self.start_if_needed()?;

        let start = format_vtt_timestamp(seg.start_seconds);
        let end = format_vtt_timestamp(seg.end_seconds);

        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{}", seg.trimmed_text())?;
        writeln!(&mut self.w)?;

        self.next_index += 1;
        Ok(())
    }

    /// Emit the header if no cue ever did, then flush. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.start_if_needed()?;
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start_seconds: start,
            end_seconds: end,
            text: text.to_string(),
            avg_log_prob: None,
        }
    }

    #[test]
    fn vtt_close_without_segments_emits_header_only() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "WEBVTT\n\n");
        Ok(())
    }

    #[test]
    fn vtt_writes_header_once_and_formats_cues() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);

        enc.write_segment(&seg(0.0, 1.5, " hello "))?;
        enc.write_segment(&seg(61.2, 62.0, "world"))?;
        enc.close()?;

        let s = std::str::from_utf8(&out)?;
        assert!(s.starts_with("WEBVTT\n\n"));
        assert!(s.contains("00:00:00.000 --> 00:00:01.500\nhello\n\n"));
        assert!(s.contains("00:01:01.200 --> 00:01:02.000\nworld\n\n"));
        assert_eq!(s.matches("WEBVTT\n\n").count(), 1);
        Ok(())
    }

    #[test]
    fn vtt_omits_cue_index_lines() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.write_segment(&seg(0.0, 1.0, "only"))?;
        enc.close()?;

        let s = std::str::from_utf8(&out)?;
        assert_eq!(s, "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nonly\n\n");
        Ok(())
    }

    #[test]
    fn vtt_rejects_inverted_timestamps_and_names_the_cue() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);

        enc.write_segment(&seg(0.0, 1.0, "fine"))?;
        let err = enc.write_segment(&seg(5.0, 4.0, "bad")).unwrap_err();
        match err {
            Error::Format(format_err) => assert_eq!(format_err.index, 2),
            other => panic!("expected FormatError, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn vtt_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_segment(&seg(0.0, 1.0, "nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
