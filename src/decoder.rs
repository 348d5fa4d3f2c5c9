//! Decode media files (audio/video containers) into mono `f32` at Murmur's
//! target sample rate.
//!
//! The batch pipeline works file-at-a-time, and whisper.cpp wants the whole
//! buffer for a full pass anyway, so this module decodes eagerly into one
//! `Vec<f32>` instead of streaming chunks:
//! - Symphonia probes the container and decodes packets
//! - multi-channel audio is downmixed by equal-weight averaging
//! - non-16 kHz audio is resampled with rubato (`SincFixedIn`)
//!
//! Plain mono 16 kHz PCM WAV skips all of that via the `wav` module.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use rubato::{Resampler, SincFixedIn, WindowFunction};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Track};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Murmur's target mono sample rate (Hz), dictated by whisper.cpp.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decode an audio file into mono samples at [`TARGET_SAMPLE_RATE`].
pub fn decode_audio_file(path: &Path) -> Result<Vec<f32>> {
    // Fast path: a WAV already in the target layout needs no probe, downmix,
    // or resample.
    if has_extension(path, "wav") {
        if let Some(samples) = crate::wav::read_target_spec_wav(path)? {
            return Ok(samples);
        }
    }

    let (mut format, track) = probe_file(path)?;
    let mut decoder = make_decoder_for_track(&track)?;

    let src_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| anyhow!("selected track has no sample rate"))?;

    let mono = decode_all_to_mono(&mut format, &mut decoder, track.id)?;
    resample_to_target(mono, src_rate)
}

/// Probe the container and pick a default audio track.
///
/// Track selection policy:
/// - choose the first track that looks decodable (codec != NULL)
/// - and has a known sample rate (required for resampling decisions downstream)
///
/// The file extension is passed to Symphonia as a probe hint; it improves
/// accuracy for ambiguous containers.
fn probe_file(path: &Path) -> Result<(Box<dyn FormatReader>, Track)> {
    let file =
        File::open(path).with_context(|| format!("failed to open audio file: {}", path.display()))?;

    let mss_opts = MediaSourceStreamOptions {
        // Symphonia expects a power-of-two buffer > 32KiB for good probing behavior.
        buffer_len: 256 * 1024,
    };
    let mss = MediaSourceStream::new(Box::new(file), mss_opts);

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts: FormatOptions = Default::default();
    let metadata_opts: MetadataOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("failed to probe media file: {}", path.display()))?;

    let format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL && t.codec_params.sample_rate.is_some())
        .cloned()
        .ok_or_else(|| anyhow!("no audio track found in {}", path.display()))?;

    Ok((format, track))
}

/// Create a decoder for the given audio track using Symphonia's default
/// codec registry.
fn make_decoder_for_track(track: &Track) -> Result<Box<dyn Decoder>> {
    let decoder_opts: DecoderOptions = Default::default();

    symphonia::default::get_codecs()
        .make(&track.codec_params, &decoder_opts)
        .map_err(|e| anyhow!(e))
        .context("failed to create decoder for audio track")
}

/// Run the packet loop to completion, downmixing every decoded buffer.
///
/// Error handling policy:
/// - `DecodeError` → skip bad frame (common with some codecs)
/// - `IoError`     → treat as end-of-stream
/// - other errors  → bubble up with context
fn decode_all_to_mono(
    format: &mut Box<dyn FormatReader>,
    decoder: &mut Box<dyn Decoder>,
    track_id: u32,
) -> Result<Vec<f32>> {
    let mut mono = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(anyhow!(e)).context("failed reading packet"),
        };

        // Ignore packets from non-audio tracks.
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(anyhow!(e)).context("decoder failure"),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if channels == 0 {
            bail!("decoded audio had zero channels");
        }

        // Copy decoded PCM into an interleaved f32 scratch buffer, reused
        // across packets.
        let buf = sample_buf
            .get_or_insert_with(|| SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        buf.copy_interleaved_ref(decoded);

        downmix_into_mono(buf.samples(), channels, &mut mono);
    }

    Ok(mono)
}

/// Downmix interleaved samples into mono by averaging channels.
///
/// Policy: equal-weight average across channels (simple, predictable).
fn downmix_into_mono(interleaved: &[f32], channels: usize, mono: &mut Vec<f32>) {
    if channels == 1 {
        mono.extend_from_slice(interleaved);
        return;
    }

    let frames = interleaved.len() / channels;
    mono.reserve(frames);

    for frame in interleaved.chunks_exact(channels) {
        let sum: f32 = frame.iter().sum();
        mono.push(sum / channels as f32);
    }
}

/// Resample a complete mono buffer to [`TARGET_SAMPLE_RATE`].
///
/// rubato expects exact input block sizes, so the tail is zero-padded to a
/// full block. The padding adds at most a few milliseconds of silence at the
/// very end, which is inaudible and harmless to transcription.
fn resample_to_target(mut mono: Vec<f32>, src_rate: u32) -> Result<Vec<f32>> {
    if src_rate == TARGET_SAMPLE_RATE || mono.is_empty() {
        return Ok(mono);
    }

    // How many source frames we feed rubato per `process()` call.
    let in_chunk_src_frames = 2048;

    let mut resampler = SincFixedIn::<f32>::new(
        TARGET_SAMPLE_RATE as f64 / src_rate as f64,
        2.0,
        rubato::SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: rubato::SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        },
        in_chunk_src_frames,
        1, // mono
    )
    .map_err(|e| anyhow!(e))
    .context("failed to init resampler")?;

    let rem = mono.len() % in_chunk_src_frames;
    if rem != 0 {
        mono.resize(mono.len() + (in_chunk_src_frames - rem), 0.0);
    }

    let estimated = (mono.len() as f64 * TARGET_SAMPLE_RATE as f64 / src_rate as f64) as usize;
    let mut out = Vec::with_capacity(estimated + in_chunk_src_frames);

    for block in mono.chunks(in_chunk_src_frames) {
        let input = vec![block.to_vec()];
        let mut waves = resampler
            .process(&input, None)
            .map_err(|e| anyhow!(e))
            .context("resampler process failed")?;

        if waves.len() != 1 {
            bail!("expected mono output from resampler");
        }
        out.append(&mut waves[0]);
    }

    Ok(out)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(wanted))
}
