use anyhow::{Result, anyhow};
use whisper_rs::{WhisperVadContext, WhisperVadParams};

/// Voice Activity Detection (VAD) preprocessing.
///
/// Behavior:
/// - Run VAD to identify speech time ranges.
/// - Convert those ranges into padded, merged sample index ranges.
/// - Keep the original buffer length and mute everything outside speech.
///
/// Muting in place (rather than cutting) preserves timeline alignment with
/// the original media, so segment timestamps stay valid for subtitles.
///
/// Returns `false` when no speech was found at all; the caller then skips
/// inference entirely.
pub(super) fn mute_non_speech(
    ctx: &mut WhisperVadContext,
    sample_rate_hz: u32,
    samples: &mut [f32],
) -> Result<bool> {
    let mut vad_params = WhisperVadParams::default();

    // Cap max speech duration to avoid producing extremely long segments.
    // (This value is in seconds in whisper_rs / whisper.cpp.)
    vad_params.set_max_speech_duration(15.0);
    vad_params.set_threshold(SPEECH_THRESHOLD);
    vad_params.set_min_speech_duration(MIN_SPEECH_MS as i32);

    let vad_segments = ctx.segments_from_samples(vad_params, samples)?;

    let ranges = speech_sample_ranges(sample_rate_hz, &vad_segments, samples.len())?;
    if ranges.is_empty() {
        return Ok(false);
    }

    mute_outside(samples, &ranges);
    Ok(true)
}

/// VAD confidence threshold (higher = more conservative).
const SPEECH_THRESHOLD: f32 = 0.5;

/// Drop speech segments shorter than this, and pad/merge with these margins.
const MIN_SPEECH_MS: u32 = 250;
const PAD_MS: u32 = 250;
const GAP_MERGE_MS: u32 = 300;

/// Convert VAD segments into sorted, non-overlapping sample index ranges:
/// short segments dropped, each kept range padded by [`PAD_MS`] on both
/// sides, and ranges closer than [`GAP_MERGE_MS`] merged.
fn speech_sample_ranges(
    sample_rate_hz: u32,
    vad_segments: &whisper_rs::WhisperVadSegments,
    samples_len: usize,
) -> Result<Vec<(usize, usize)>> {
    let sample_rate = sample_rate_hz as f32;
    let pad = ms_to_samples(PAD_MS, sample_rate);
    let min_speech = ms_to_samples(MIN_SPEECH_MS, sample_rate);
    let gap_merge = ms_to_samples(GAP_MERGE_MS, sample_rate);

    let mut ranges: Vec<(usize, usize)> = Vec::new();

    for i in 0..vad_segments.num_segments() {
        // VAD timestamps are centiseconds (10ms units).
        let start_cs = vad_segments
            .get_segment_start_timestamp(i)
            .ok_or_else(|| anyhow!("missing start timestamp for VAD segment {i}"))?;
        let end_cs = vad_segments
            .get_segment_end_timestamp(i)
            .ok_or_else(|| anyhow!("missing end timestamp for VAD segment {i}"))?;

        // floor() the start and ceil() the end so the first and last speech
        // samples are always included; clamp so slicing stays safe.
        let start_idx = ((start_cs / 100.0 * sample_rate).floor() as usize).min(samples_len);
        let end_idx = ((end_cs / 100.0 * sample_rate).ceil() as usize).min(samples_len);

        if end_idx.saturating_sub(start_idx) < min_speech {
            continue;
        }

        let padded_start = start_idx.saturating_sub(pad);
        let padded_end = (end_idx + pad).min(samples_len);
        if padded_start >= padded_end {
            continue;
        }

        // Merge with the previous range when overlapping or nearly touching.
        if let Some((_, prev_end)) = ranges.last_mut() {
            if padded_start <= *prev_end + gap_merge {
                *prev_end = (*prev_end).max(padded_end);
                continue;
            }
        }

        ranges.push((padded_start, padded_end));
    }

    Ok(ranges)
}

/// Zero every sample outside the given ranges.
///
/// `ranges` must be sorted and non-overlapping; `speech_sample_ranges`
/// guarantees this.
fn mute_outside(samples: &mut [f32], ranges: &[(usize, usize)]) {
    let mut cursor = 0usize;

    for &(start, end) in ranges {
        let start = start.min(samples.len());
        let end = end.min(samples.len());

        if start > cursor {
            samples[cursor..start].fill(0.0);
        }
        cursor = cursor.max(end);
    }

    if cursor < samples.len() {
        samples[cursor..].fill(0.0);
    }
}

/// Convert milliseconds → number of samples at `sample_rate`.
fn ms_to_samples(ms: u32, sample_rate: f32) -> usize {
    ((ms as f32 / 1000.0) * sample_rate).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mute_outside_zeroes_gaps_only() {
        let mut samples = vec![1.0f32; 10];
        mute_outside(&mut samples, &[(2, 4), (7, 9)]);
        assert_eq!(
            samples,
            vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn mute_outside_with_no_ranges_silences_everything() {
        let mut samples = vec![1.0f32; 4];
        mute_outside(&mut samples, &[]);
        assert_eq!(samples, vec![0.0; 4]);
    }

    #[test]
    fn ms_to_samples_rounds() {
        assert_eq!(ms_to_samples(250, 16_000.0), 4000);
        assert_eq!(ms_to_samples(1, 16_000.0), 16);
    }
}
