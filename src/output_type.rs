/// The supported output formats for encoded transcription segments.
///
/// Why this exists:
/// - We want a single, strongly-typed representation of output formats
///   across the CLI and library code.
/// - Using an enum avoids stringly-typed conditionals and keeps format
///   selection explicit and discoverable.
///
/// Integration notes:
/// - With the `cli` feature enabled, `ValueEnum` allows this enum to be used
///   directly as a CLI flag with `clap`.
/// - Each variant maps to a concrete `SegmentEncoder` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Plain text, one line per segment.
    Txt,

    /// SRT subtitle format.
    Srt,

    /// WebVTT subtitle format.
    Vtt,

    /// JSON array of segment objects.
    Json,
}

impl OutputType {
    /// All formats, in the order output files are written.
    pub const ALL: [OutputType; 4] = [
        OutputType::Txt,
        OutputType::Srt,
        OutputType::Vtt,
        OutputType::Json,
    ];

    /// The file extension used for this format's output files.
    pub fn extension(self) -> &'static str {
        match self {
            OutputType::Txt => "txt",
            OutputType::Srt => "srt",
            OutputType::Vtt => "vtt",
            OutputType::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for output_type in OutputType::ALL {
            assert!(seen.insert(output_type.extension()));
        }
    }
}
