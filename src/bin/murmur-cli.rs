use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use murmur::backends::whisper::WhisperBackend;
use murmur::batch::{BatchOpts, BatchSummary, run_batch};
use murmur::discover::collect_audio_files;
use murmur::logging;
use murmur::opts::{Opts, Task};
use murmur::output_type::OutputType;

fn main() -> Result<()> {
    logging::init();
    let params = Params::parse();

    let files = collect_audio_files(&params.inputs)?;
    if files.is_empty() {
        bail!("no audio files found in the given inputs");
    }

    if params.enable_voice_activity_detection && params.vad_model_path.is_none() {
        bail!("--enable-vad requires --vad-model");
    }

    // Load models once; the backend is reused for every file in the batch.
    let mut backend = WhisperBackend::new(&params.model_path, params.vad_model_path.as_deref())?;

    let opts = Opts {
        language: params.language.clone(),
        task: params.task,
        beam_size: params.beam_size,
        threads: params.threads,
        enable_voice_activity_detection: params.enable_voice_activity_detection,
    };

    let batch = BatchOpts {
        out_dir: params.out_dir.clone(),
        formats: params.format.output_types(),
        overwrite: !params.no_overwrite,
    };

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos}/{len} {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let summary = run_batch(&mut backend, &files, &opts, &batch, |path| {
        if let Some(name) = path.file_name() {
            bar.set_message(name.to_string_lossy().into_owned());
        }
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    report(&summary, &params.out_dir);

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn report(summary: &BatchSummary, out_dir: &std::path::Path) {
    println!(
        "wrote {} output file(s) to {}",
        summary.written.len(),
        out_dir.display()
    );

    if !summary.skipped_existing.is_empty() {
        println!(
            "skipped {} existing file(s); rerun without --no-overwrite to replace them",
            summary.skipped_existing.len()
        );
    }

    if !summary.failures.is_empty() {
        eprintln!("{} failure(s):", summary.failures.len());
        for failure in &summary.failures {
            match failure.format {
                Some(format) => eprintln!(
                    "  {} [{}]: {}",
                    failure.input.display(),
                    format.extension(),
                    failure.error
                ),
                None => eprintln!("  {}: {}", failure.input.display(), failure.error),
            }
        }
    }
}

/// Which output formats to write.
///
/// This is CLI-level vocabulary: `all` expands to every [`OutputType`] and
/// never reaches the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Txt,
    Srt,
    Vtt,
    Json,
    All,
}

impl FormatArg {
    fn output_types(self) -> Vec<OutputType> {
        match self {
            FormatArg::Txt => vec![OutputType::Txt],
            FormatArg::Srt => vec![OutputType::Srt],
            FormatArg::Vtt => vec![OutputType::Vtt],
            FormatArg::Json => vec![OutputType::Json],
            FormatArg::All => OutputType::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "Transcribe local audio files into TXT/SRT/VTT/JSON")]
struct Params {
    /// Input files, directories, or simple glob patterns.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory to write outputs (created if missing).
    #[arg(long = "out-dir", default_value = "transcripts")]
    out_dir: PathBuf,

    /// Path to the Whisper model (ggml format).
    #[arg(short = 'm', long = "model")]
    model_path: String,

    /// Path to a Whisper VAD model; required for --enable-vad.
    #[arg(long = "vad-model")]
    vad_model_path: Option<String>,

    /// Spoken language hint (auto-detect if omitted).
    #[arg(short = 'l', long = "language")]
    language: Option<String>,

    /// Transcribe verbatim or translate to English.
    #[arg(long = "task", value_enum, default_value_t = Task::Transcribe)]
    task: Task,

    /// Beam size for decoding.
    #[arg(long = "beam-size", default_value_t = 5)]
    beam_size: u32,

    /// Inference threads (0 = all cores).
    #[arg(long = "threads", default_value_t = 0)]
    threads: usize,

    /// Mute non-speech audio before inference to reduce hallucinations.
    #[arg(long = "enable-vad", default_value_t = false)]
    enable_voice_activity_detection: bool,

    /// Output format(s) to write per input.
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = FormatArg::All
    )]
    format: FormatArg,

    /// Leave existing output files untouched instead of replacing them.
    #[arg(long = "no-overwrite", default_value_t = false)]
    no_overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_minimal_invocation() {
        let params =
            Params::try_parse_from(["murmur", "-m", "models/ggml-small.bin", "audio.m4a"])
                .expect("parse minimal params");

        assert_eq!(params.inputs, vec![PathBuf::from("audio.m4a")]);
        assert_eq!(params.out_dir, PathBuf::from("transcripts"));
        assert_eq!(params.format, FormatArg::All);
        assert_eq!(params.beam_size, 5);
        assert!(!params.no_overwrite);
    }

    #[test]
    fn params_require_inputs() {
        assert!(Params::try_parse_from(["murmur", "-m", "model.bin"]).is_err());
    }

    #[test]
    fn format_all_expands_to_every_output_type() {
        assert_eq!(FormatArg::All.output_types(), OutputType::ALL.to_vec());
        assert_eq!(FormatArg::Srt.output_types(), vec![OutputType::Srt]);
    }
}
