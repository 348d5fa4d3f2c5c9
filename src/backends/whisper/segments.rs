use anyhow::Context;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperSegment, WhisperState};

use crate::Result;
use crate::opts::{Opts, Task};
use crate::segments::Segment;

pub(super) fn collect_segments(
    ctx: &WhisperContext,
    opts: &Opts,
    samples: &[f32],
) -> Result<Vec<Segment>> {
    let state = run_whisper_full(ctx, opts, samples)?;

    let mut segments = Vec::new();
    for whisper_segment in state.as_iter() {
        segments.push(to_segment(whisper_segment)?);
    }
    Ok(segments)
}

fn to_segment(whisper_segment: WhisperSegment) -> Result<Segment> {
    let text = whisper_segment
        .to_str()
        .context("failed to get segment text")?
        .to_owned();

    // Whisper timestamps are centiseconds (10ms units); -1 means unknown and
    // is clamped to 0 so a missing start never turns into a negative time.
    let start_seconds = centiseconds_to_seconds(whisper_segment.start_timestamp());
    let end_seconds = centiseconds_to_seconds(whisper_segment.end_timestamp());

    let avg_log_prob = avg_log_prob(&whisper_segment)?;

    // `Segment::new` enforces the timing invariant; a degenerate whisper
    // segment surfaces as `MalformedSegment` and aborts this file only.
    let mut segment = Segment::new(start_seconds, end_seconds, text)?;
    segment.avg_log_prob = avg_log_prob;
    Ok(segment)
}

/// Mean natural-log probability across the segment's real tokens.
///
/// Whisper special/control tokens (formatted like `[_BEG_]`, `[_TT_50]`) are
/// excluded; they carry bookkeeping, not speech. Returns `None` when a
/// segment has no real tokens at all.
fn avg_log_prob(whisper_segment: &WhisperSegment) -> Result<Option<f64>> {
    let token_count = whisper_segment.n_tokens();

    let mut sum = 0.0_f64;
    let mut counted = 0_usize;

    for token_idx in 0..token_count {
        let token = whisper_segment
            .get_token(token_idx)
            .context("failed to get token from segment")?;

        let text = token
            .to_str()
            .with_context(|| format!("failed to get token text at index {token_idx}"))?;
        if text.starts_with("[_") && text.ends_with("_]") {
            continue;
        }

        let probability = f64::from(token.token_data().p).max(f64::MIN_POSITIVE);
        sum += probability.ln();
        counted += 1;
    }

    Ok((counted > 0).then(|| sum / counted as f64))
}

fn centiseconds_to_seconds(centiseconds: i64) -> f64 {
    centiseconds.max(0) as f64 / 100.0
}

fn build_full_params(opts: &Opts) -> FullParams<'_, '_> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: opts.beam_size as i32,
        patience: 1.0,
    });

    let threads = if opts.threads == 0 {
        num_cpus::get()
    } else {
        opts.threads
    };
    params.set_n_threads(threads as i32);

    params.set_translate(opts.task == Task::Translate);
    params.set_language(opts.language.as_deref());
    params.set_no_context(true);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    params
}

fn run_whisper_full(ctx: &WhisperContext, opts: &Opts, samples: &[f32]) -> Result<WhisperState> {
    let params = build_full_params(opts);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centiseconds_convert_and_clamp() {
        assert_eq!(centiseconds_to_seconds(150), 1.5);
        assert_eq!(centiseconds_to_seconds(0), 0.0);
        assert_eq!(centiseconds_to_seconds(-1), 0.0);
    }
}
