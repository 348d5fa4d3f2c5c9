use std::path::Path;

use crate::Result;
use crate::opts::Opts;
use crate::segments::Segment;

/// Pluggable ASR backend used by the batch pipeline.
///
/// This is the entire collaborator contract with the inference library: one
/// call per audio file, producing segments in non-decreasing `start` order.
/// Everything behind it (model loading, decoding, VAD, beam search) is the
/// backend's business, which is what lets tests swap in a deterministic stub
/// and exercise formatting and batch behavior without any model files.
///
/// `transcribe` takes `&mut self` because whisper_rs's VAD context requires
/// mutable access to run inference.
pub trait Transcriber {
    /// Transcribe one audio file into an ordered sequence of segments.
    fn transcribe(&mut self, audio_path: &Path, opts: &Opts) -> Result<Vec<Segment>>;
}
