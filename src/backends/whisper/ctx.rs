use anyhow::{Context, Result};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use super::logging::init_whisper_logging;

/// Load a Whisper model and return an initialized `WhisperContext`.
///
/// Why this exists:
/// - We centralize model loading in one place so error handling and defaults
///   stay consistent.
pub(super) fn get_context(model_path: &str) -> Result<WhisperContext> {
    // Silence logs emitted by whisper.rs / whisper.cpp: they are very noisy
    // and would interleave with our own output and progress bars.
    init_whisper_logging();

    let ctx_params = WhisperContextParameters::default();

    let ctx = WhisperContext::new_with_params(model_path, ctx_params)
        .with_context(|| format!("failed to load model from path: {model_path}"))?;

    Ok(ctx)
}
