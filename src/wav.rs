use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};

use crate::decoder::TARGET_SAMPLE_RATE;

/// Try to load a WAV file on the fast path: mono 16-bit PCM at the target
/// sample rate, read directly with `hound` and normalized to `[-1.0, 1.0]`.
///
/// Returns `Ok(None)` when the file is a valid WAV but in some other layout
/// (stereo, different rate, float samples); the caller then falls back to the
/// full decode pipeline, which can downmix and resample.
pub fn read_target_spec_wav(path: &Path) -> Result<Option<Vec<f32>>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open WAV file: {}", path.display()))?;

    let mut reader = WavReader::new(BufReader::new(file))
        .with_context(|| format!("failed to read WAV header: {}", path.display()))?;
    let spec = reader.spec();

    let fast_path = spec.channels == 1
        && spec.sample_rate == TARGET_SAMPLE_RATE
        && spec.sample_format == SampleFormat::Int
        && spec.bits_per_sample == 16;
    if !fast_path {
        return Ok(None);
    }

    // Normalize from i16 PCM to f32 in [-1.0, 1.0], the format ASR backends expect.
    let mut samples = Vec::with_capacity(reader.len() as usize);
    for sample in reader.samples::<i16>() {
        let pcm = sample.context("failed to read WAV sample")?;
        samples.push(pcm as f32 / i16::MAX as f32);
    }

    Ok(Some(samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn write_wav(path: &Path, spec: WavSpec, samples: &[i16]) -> anyhow::Result<()> {
        let mut writer = WavWriter::create(path, spec)?;
        for &s in samples {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
        Ok(())
    }

    #[test]
    fn reads_mono_16k_wav() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tone.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: TARGET_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &[0, i16::MAX, i16::MIN / 2])?;

        let samples = read_target_spec_wav(&path)?.expect("fast path should apply");
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 1.0).abs() < 1e-6);
        assert!(samples[2] < 0.0);
        Ok(())
    }

    #[test]
    fn declines_non_target_layouts() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &[0, 0, 1, 1])?;

        assert!(read_target_spec_wav(&path)?.is_none());
        Ok(())
    }

    #[test]
    fn errors_on_missing_file() {
        let err = read_target_spec_wav(Path::new("/nonexistent/missing.wav")).unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }
}
