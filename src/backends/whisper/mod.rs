use std::path::Path;

use anyhow::Context;
use whisper_rs::{WhisperContext, WhisperVadContext, WhisperVadContextParams};

use crate::Result;
use crate::backend::Transcriber;
use crate::decoder::{TARGET_SAMPLE_RATE, decode_audio_file};
use crate::opts::Opts;
use crate::segments::Segment;

mod ctx;
mod logging;
mod segments;
mod vad;

use segments::collect_segments;
use vad::mute_non_speech;

/// Built-in backend powered by `whisper-rs` / `whisper.cpp`.
///
/// Construct once (model loading is expensive) and reuse across a whole
/// batch. The VAD model is optional: without one, requesting VAD in
/// [`Opts`] is an error rather than a silent no-op.
pub struct WhisperBackend {
    ctx: WhisperContext,
    vad_ctx: Option<WhisperVadContext>,
}

impl WhisperBackend {
    /// Load a whisper.cpp model (and, optionally, a VAD model) from disk.
    ///
    /// We fail fast on missing or invalid paths so that once `new` succeeds,
    /// every later `transcribe` call can assume its models are available.
    pub fn new(model_path: &str, vad_model_path: Option<&str>) -> Result<Self> {
        if model_path.trim().is_empty() {
            return Err(crate::Error::msg("model path must be provided"));
        }

        let ctx = ctx::get_context(model_path)?;

        let vad_ctx = match vad_model_path {
            None => None,
            Some(vad_model_path) => Some(load_vad_context(vad_model_path)?),
        };

        Ok(Self { ctx, vad_ctx })
    }

    /// Access the underlying Whisper context.
    ///
    /// This is primarily intended for advanced or experimental use-cases.
    pub fn context(&self) -> &WhisperContext {
        &self.ctx
    }
}

fn load_vad_context(vad_model_path: &str) -> Result<WhisperVadContext> {
    if !Path::new(vad_model_path).is_file() {
        return Err(crate::Error::msg(format!(
            "VAD model not found at '{vad_model_path}'"
        )));
    }

    // Load the VAD model once so repeated transcriptions don't re-initialize it.
    let vad_ctx_params = WhisperVadContextParams::default();
    let vad_ctx = WhisperVadContext::new(vad_model_path, vad_ctx_params)
        .with_context(|| format!("failed to load VAD model from '{vad_model_path}'"))?;

    Ok(vad_ctx)
}

impl Transcriber for WhisperBackend {
    fn transcribe(&mut self, audio_path: &Path, opts: &Opts) -> Result<Vec<Segment>> {
        let mut samples = decode_audio_file(audio_path)?;
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        if opts.enable_voice_activity_detection {
            let vad_ctx = self
                .vad_ctx
                .as_mut()
                .ok_or_else(|| crate::Error::msg("VAD was requested but no VAD model is loaded"))?;

            let found_speech = mute_non_speech(vad_ctx, TARGET_SAMPLE_RATE, &mut samples)?;
            if !found_speech {
                tracing::debug!(path = %audio_path.display(), "no speech detected, skipping inference");
                return Ok(Vec::new());
            }
        }

        collect_segments(&self.ctx, opts, &samples)
    }
}
