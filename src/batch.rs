//! The batch pipeline: transcribe many inputs, render every requested
//! format, and write each output atomically.
//!
//! Failure isolation policy:
//! - an input that fails to transcribe is recorded and skipped; the batch
//!   continues
//! - a format that fails to render or write is recorded; the same file's
//!   other formats still go out
//! - nothing is reported mid-stream: callers get one [`BatchSummary`] after
//!   the whole batch, so failures are never silently interleaved
//!
//! Output naming: each input maps to `<out_dir>/<stem>.<ext>`. Two inputs
//! with the same stem would overwrite each other, so every member of a
//! colliding group is skipped and recorded as a `DuplicateOutputTarget`
//! failure. Suffixing was considered and rejected: which file gets the
//! suffix would depend on argument order, making reruns rename outputs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::backend::Transcriber;
use crate::error::{Error, Result};
use crate::opts::Opts;
use crate::output_type::OutputType;
use crate::render::{to_json, to_srt, to_text, to_vtt};
use crate::segments::Segment;
use crate::writer::write_atomic;

/// Where and how outputs are written. Orthogonal to [`Opts`], which controls
/// the transcription itself.
#[derive(Debug, Clone)]
pub struct BatchOpts {
    /// Directory receiving all output files (created if missing).
    pub out_dir: PathBuf,

    /// Formats to write per input, in write order.
    pub formats: Vec<OutputType>,

    /// Whether existing output files are replaced. When `false`, existing
    /// targets are reported as skipped, not as errors.
    pub overwrite: bool,
}

impl BatchOpts {
    /// All four formats into `out_dir`, overwriting existing files.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            formats: OutputType::ALL.to_vec(),
            overwrite: true,
        }
    }
}

/// One recorded failure, scoped as narrowly as the error allows.
#[derive(Debug)]
pub struct OutputFailure {
    pub input: PathBuf,

    /// The format that failed, or `None` when the whole file failed
    /// (transcription error, duplicate output target).
    pub format: Option<OutputType>,

    pub error: Error,
}

/// What happened across a whole batch. Returned once, after every input has
/// been attempted.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Output files written this run.
    pub written: Vec<PathBuf>,

    /// Output targets left untouched because they exist and overwrite is off.
    pub skipped_existing: Vec<PathBuf>,

    /// Everything that went wrong, in discovery order.
    pub failures: Vec<OutputFailure>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Transcribe every input and write the requested formats.
///
/// `on_file_done` fires after each input finishes (successfully or not);
/// the CLI uses it to advance its progress bar.
///
/// The only hard error is failing to create `out_dir`; everything past that
/// point is per-file and lands in the summary instead.
pub fn run_batch<T: Transcriber>(
    transcriber: &mut T,
    inputs: &[PathBuf],
    opts: &Opts,
    batch: &BatchOpts,
    mut on_file_done: impl FnMut(&Path),
) -> Result<BatchSummary> {
    std::fs::create_dir_all(&batch.out_dir)?;

    let mut summary = BatchSummary::default();
    let planned = plan_unique_stems(inputs, &mut summary);

    for (input, stem) in planned {
        process_file(transcriber, &input, &stem, opts, batch, &mut summary);
        on_file_done(&input);
    }

    Ok(summary)
}

/// Resolve each input's output stem and weed out collisions.
///
/// Returns the inputs that are safe to process. Collisions and inputs
/// without a usable file name are recorded as failures.
fn plan_unique_stems(inputs: &[PathBuf], summary: &mut BatchSummary) -> Vec<(PathBuf, String)> {
    let mut stems: Vec<Option<String>> = Vec::with_capacity(inputs.len());
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();

    for (idx, input) in inputs.iter().enumerate() {
        match input.file_stem().map(|s| s.to_string_lossy().into_owned()) {
            Some(stem) => {
                groups.entry(stem.clone()).or_default().push(idx);
                stems.push(Some(stem));
            }
            None => {
                summary.failures.push(OutputFailure {
                    input: input.clone(),
                    format: None,
                    error: Error::msg("input has no usable file name"),
                });
                stems.push(None);
            }
        }
    }

    let mut planned = Vec::with_capacity(inputs.len());

    for (idx, stem) in stems.into_iter().enumerate() {
        let Some(stem) = stem else { continue };

        let group = &groups[&stem];
        if group.len() > 1 {
            // Name the two colliding paths in input order; for the first
            // member of the group that means pairing it with the second.
            let partner = if idx == group[0] { group[1] } else { group[0] };
            let (first, second) = if partner < idx {
                (inputs[partner].clone(), inputs[idx].clone())
            } else {
                (inputs[idx].clone(), inputs[partner].clone())
            };

            summary.failures.push(OutputFailure {
                input: inputs[idx].clone(),
                format: None,
                error: Error::DuplicateOutputTarget {
                    first,
                    second,
                    stem: stem.clone(),
                },
            });
            continue;
        }

        planned.push((inputs[idx].clone(), stem));
    }

    planned
}

fn process_file<T: Transcriber>(
    transcriber: &mut T,
    input: &Path,
    stem: &str,
    opts: &Opts,
    batch: &BatchOpts,
    summary: &mut BatchSummary,
) {
    let segments = match transcriber.transcribe(input, opts) {
        Ok(segments) => segments,
        Err(error) => {
            tracing::warn!(input = %input.display(), %error, "transcription failed");
            summary.failures.push(OutputFailure {
                input: input.to_path_buf(),
                format: None,
                error,
            });
            return;
        }
    };

    tracing::info!(
        input = %input.display(),
        segments = segments.len(),
        "transcribed"
    );

    for &format in &batch.formats {
        let target = batch
            .out_dir
            .join(format!("{stem}.{}", format.extension()));

        let outcome = render(format, &segments)
            .and_then(|text| write_atomic(&target, text.as_bytes(), batch.overwrite));

        match outcome {
            Ok(true) => summary.written.push(target),
            Ok(false) => summary.skipped_existing.push(target),
            Err(error) => {
                tracing::warn!(
                    input = %input.display(),
                    format = format.extension(),
                    %error,
                    "output failed"
                );
                summary.failures.push(OutputFailure {
                    input: input.to_path_buf(),
                    format: Some(format),
                    error,
                });
            }
        }
    }
}

fn render(format: OutputType, segments: &[Segment]) -> Result<String> {
    match format {
        OutputType::Txt => to_text(segments),
        OutputType::Srt => to_srt(segments),
        OutputType::Vtt => to_vtt(segments),
        OutputType::Json => to_json(segments),
    }
}
