//! Pure, whole-transcript rendering.
//!
//! The encoders in this crate stream cue-by-cue into any `io::Write`. These
//! helpers wrap them for the common batch case: render an ordered slice of
//! segments fully in memory and hand back one `String`. Rendering in memory
//! is also what makes file output atomic; a formatter failure means the
//! buffer is dropped and nothing ever reaches disk.
//!
//! All four functions are deterministic and stateless: calling one twice on
//! the same slice produces byte-identical output, and an empty slice yields
//! the format's well-formed empty equivalent instead of an error.

use crate::Result;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::srt_encoder::SrtEncoder;
use crate::txt_encoder::TxtEncoder;
use crate::vtt_encoder::VttEncoder;

/// Render segments as plain text, one trimmed line per segment.
pub fn to_text(segments: &[Segment]) -> Result<String> {
    let mut buf = Vec::new();
    drive(TxtEncoder::new(&mut buf), segments)?;
    Ok(String::from_utf8(buf)?)
}

/// Render segments as an SRT subtitle file.
///
/// Fails with [`crate::FormatError`] on the first segment whose `end`
/// precedes its `start`; no partial output is returned.
pub fn to_srt(segments: &[Segment]) -> Result<String> {
    let mut buf = Vec::new();
    drive(SrtEncoder::new(&mut buf), segments)?;
    Ok(String::from_utf8(buf)?)
}

/// Render segments as a WebVTT subtitle file.
///
/// Same fail-fast timing validation as [`to_srt`]. An empty slice yields
/// just the `WEBVTT` header block.
pub fn to_vtt(segments: &[Segment]) -> Result<String> {
    let mut buf = Vec::new();
    drive(VttEncoder::new(&mut buf), segments)?;
    Ok(String::from_utf8(buf)?)
}

/// Render segments as a JSON array of `{index, start, end, text, avg_log_prob}`.
pub fn to_json(segments: &[Segment]) -> Result<String> {
    let mut buf = Vec::new();
    drive(JsonArrayEncoder::new(&mut buf), segments)?;
    Ok(String::from_utf8(buf)?)
}

/// Feed every segment through an encoder in input order, then close it.
fn drive<E: SegmentEncoder>(mut encoder: E, segments: &[Segment]) -> Result<()> {
    for segment in segments {
        encoder.write_segment(segment)?;
    }
    encoder.close()
}
