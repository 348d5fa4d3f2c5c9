/// Whether the backend should transcribe verbatim or translate to English.
///
/// whisper.cpp only supports translation *into* English, so this is a
/// two-state switch rather than a target-language option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Task {
    #[default]
    Transcribe,
    Translate,
}

/// Options that control how a transcription is performed.
///
/// This struct represents *library-level configuration*, not CLI flags
/// directly. The CLI is responsible for mapping user input into this type so
/// that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (batch jobs, tests) can construct options programmatically
///
/// The batch pipeline treats this as an opaque bag: interpretation belongs
/// entirely to the [`crate::backend::Transcriber`] implementation.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Optional language hint (e.g. `"en"`, `"es"`).
    ///
    /// When `None`, we allow Whisper to auto-detect the spoken language.
    pub language: Option<String>,

    /// Transcribe verbatim or translate to English.
    pub task: Task,

    /// Beam size for decoding.
    pub beam_size: u32,

    /// Number of inference threads. `0` means "use all available cores".
    pub threads: usize,

    /// Whether to apply voice activity detection (VAD) before transcription.
    ///
    /// When enabled:
    /// - Non-speech regions are zeroed out in the audio buffer.
    /// - If no speech is detected at all, transcription exits early with no
    ///   segments.
    pub enable_voice_activity_detection: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            language: None,
            task: Task::Transcribe,
            beam_size: 5,
            threads: 0,
            enable_voice_activity_detection: false,
        }
    }
}
