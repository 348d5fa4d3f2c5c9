//! `murmur` — batch audio transcription into TXT/SRT/VTT/JSON, built on Whisper.
//!
//! This crate provides:
//! - A `Segment` model and pluggable output encoders (TXT, SRT, WebVTT, JSON)
//! - Whole-transcript rendering helpers with fail-fast timing validation
//! - A narrow `Transcriber` boundary with a built-in whisper.cpp backend
//! - Audio decoding (any Symphonia-supported container) to mono 16 kHz
//! - A batch pipeline with atomic output writes and per-file failure isolation
//!
//! The library is designed so that everything except the whisper backend is
//! testable without model files: swap a deterministic `Transcriber` stub into
//! the batch pipeline and the rest of the crate runs as-is.

// Crate-wide error and result types.
mod error;
pub use error::{Error, FormatError, Result};

// Segment data structures and subtitle timestamp handling.
pub mod segments;
pub mod timestamp;

// Output selection and encoder interfaces.
pub mod output_type;
pub mod segment_encoder;

// Output encoders that serialize segments into various formats.
pub mod json_array_encoder;
pub mod srt_encoder;
pub mod txt_encoder;
pub mod vtt_encoder;

// Whole-transcript rendering helpers built on the encoders.
pub mod render;

// Transcription configuration and the ASR backend boundary.
pub mod backend;
pub mod backends;
pub mod opts;

// Audio preprocessing and decoding.
pub mod decoder;
pub mod wav;

// Input discovery, batch orchestration, and atomic output writing.
pub mod batch;
pub mod discover;
pub mod writer;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;
