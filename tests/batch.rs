use std::path::{Path, PathBuf};

use murmur::backend::Transcriber;
use murmur::batch::{BatchOpts, run_batch};
use murmur::opts::Opts;
use murmur::output_type::OutputType;
use murmur::segments::Segment;
use murmur::{Error, Result};

/// Deterministic stand-in for the whisper backend: segments derived from the
/// input's file name, no model files, no audio decoding.
struct StubTranscriber;

impl Transcriber for StubTranscriber {
    fn transcribe(&mut self, audio_path: &Path, _opts: &Opts) -> Result<Vec<Segment>> {
        let stem = audio_path
            .file_stem()
            .expect("test inputs have file names")
            .to_string_lossy()
            .into_owned();

        if stem.contains("boom") {
            return Err(Error::Message("simulated transcription failure".into()));
        }

        if stem.contains("inverted") {
            // Raw construction bypasses Segment::new on purpose: this is the
            // defense-in-depth case the subtitle formatters must catch.
            return Ok(vec![Segment {
                start_seconds: 5.0,
                end_seconds: 4.0,
                text: "bad".to_string(),
                avg_log_prob: None,
            }]);
        }

        Ok(vec![
            Segment::new(0.0, 1.5, "hello")?,
            Segment::new(1.5, 3.2, format!("from {stem}"))?,
        ])
    }
}

fn run(
    inputs: &[PathBuf],
    batch: &BatchOpts,
) -> anyhow::Result<murmur::batch::BatchSummary> {
    let mut stub = StubTranscriber;
    let opts = Opts::default();
    Ok(run_batch(&mut stub, inputs, &opts, batch, |_| {})?)
}

#[test]
fn writes_all_four_formats_per_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let batch = BatchOpts::new(dir.path());

    let summary = run(&[PathBuf::from("talk.wav")], &batch)?;
    assert!(summary.is_success());
    assert_eq!(summary.written.len(), 4);

    let txt = std::fs::read_to_string(dir.path().join("talk.txt"))?;
    assert_eq!(txt, "hello\nfrom talk\n");

    let srt = std::fs::read_to_string(dir.path().join("talk.srt"))?;
    assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,500\nhello\n"));
    assert!(srt.contains("\n2\n00:00:01,500 --> 00:00:03,200\nfrom talk\n"));

    let vtt = std::fs::read_to_string(dir.path().join("talk.vtt"))?;
    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert!(vtt.contains("00:00:00.000 --> 00:00:01.500\nhello\n"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("talk.json"))?)?;
    let arr = json.as_array().expect("json array");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["index"], 1);
    assert_eq!(arr[1]["text"], "from talk");
    Ok(())
}

#[test]
fn duplicate_stems_skip_every_colliding_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let batch = BatchOpts::new(dir.path());

    let inputs = vec![PathBuf::from("a/talk.m4a"), PathBuf::from("b/talk.mp3")];
    let summary = run(&inputs, &batch)?;

    assert!(summary.written.is_empty());
    assert_eq!(summary.failures.len(), 2);
    for failure in &summary.failures {
        assert!(matches!(
            failure.error,
            Error::DuplicateOutputTarget { ref stem, .. } if stem == "talk"
        ));
    }
    assert!(!dir.path().join("talk.txt").exists());
    Ok(())
}

#[test]
fn format_failures_do_not_block_other_formats() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let batch = BatchOpts::new(dir.path());

    let summary = run(&[PathBuf::from("inverted.wav")], &batch)?;

    // TXT and JSON went out; SRT and VTT hit the timing check.
    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.failures.len(), 2);

    assert!(dir.path().join("inverted.txt").exists());
    assert!(dir.path().join("inverted.json").exists());
    assert!(!dir.path().join("inverted.srt").exists());
    assert!(!dir.path().join("inverted.vtt").exists());

    let failed_formats: Vec<_> = summary
        .failures
        .iter()
        .filter_map(|failure| failure.format)
        .collect();
    assert_eq!(failed_formats, vec![OutputType::Srt, OutputType::Vtt]);
    for failure in &summary.failures {
        assert!(matches!(
            failure.error,
            Error::Format(format_err) if format_err.index == 1
        ));
    }
    Ok(())
}

#[test]
fn one_failing_file_does_not_stop_the_batch() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let batch = BatchOpts::new(dir.path());

    let inputs = vec![PathBuf::from("boom.wav"), PathBuf::from("fine.wav")];
    let summary = run(&inputs, &batch)?;

    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].format.is_none());
    assert_eq!(summary.written.len(), 4);
    assert!(dir.path().join("fine.srt").exists());
    Ok(())
}

#[test]
fn no_overwrite_reports_existing_targets_as_skipped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let first = BatchOpts::new(dir.path());
    let summary = run(&[PathBuf::from("talk.wav")], &first)?;
    assert_eq!(summary.written.len(), 4);

    let second = BatchOpts {
        overwrite: false,
        ..BatchOpts::new(dir.path())
    };
    let summary = run(&[PathBuf::from("talk.wav")], &second)?;

    assert!(summary.is_success());
    assert!(summary.written.is_empty());
    assert_eq!(summary.skipped_existing.len(), 4);
    Ok(())
}

#[test]
fn single_format_selection_writes_only_that_format() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let batch = BatchOpts {
        formats: vec![OutputType::Srt],
        ..BatchOpts::new(dir.path())
    };

    let summary = run(&[PathBuf::from("talk.wav")], &batch)?;
    assert_eq!(summary.written, vec![dir.path().join("talk.srt")]);
    assert!(!dir.path().join("talk.txt").exists());
    Ok(())
}

#[test]
fn progress_hook_fires_once_per_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let batch = BatchOpts::new(dir.path());
    let inputs = vec![PathBuf::from("one.wav"), PathBuf::from("two.wav")];

    let mut seen = Vec::new();
    let mut stub = StubTranscriber;
    run_batch(&mut stub, &inputs, &Opts::default(), &batch, |path| {
        seen.push(path.to_path_buf());
    })?;

    assert_eq!(seen, inputs);
    Ok(())
}
