//! Input discovery: expand CLI arguments into a concrete list of audio files.
//!
//! Accepted argument shapes:
//! - a file path (kept when its extension is a known audio type)
//! - a directory (searched recursively)
//! - a simple glob pattern over file names (`*` and `?`), matched within the
//!   pattern's parent directory
//!
//! The result is deduplicated and stably ordered: arguments in the order
//! given, directory contents sorted by name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::Result;

/// Extensions we treat as transcribable audio (or audio-bearing) containers.
pub const AUDIO_EXTENSIONS: &[&str] = &["flac", "m4a", "mp3", "mp4", "ogg", "wav"];

/// Expand files, directories, and simple glob patterns into audio file paths.
pub fn collect_audio_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for input in inputs {
        if input.is_dir() {
            walk_dir(input, &mut found)?;
        } else if input.is_file() {
            if has_audio_extension(input) {
                found.push(input.clone());
            }
        } else {
            expand_glob(input, &mut found)?;
        }
    }

    // Deduplicate while keeping stable order.
    let mut seen = HashSet::new();
    found.retain(|path| seen.insert(path.clone()));

    Ok(found)
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Recursively collect audio files under `dir`, sorted by name per directory
/// so discovery order doesn't depend on filesystem iteration order.
fn walk_dir(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_dir(&path, found)?;
        } else if path.is_file() && has_audio_extension(&path) {
            found.push(path);
        }
    }

    Ok(())
}

/// Match a `parent/pattern` argument against the files in `parent`.
///
/// A pattern that matches nothing contributes nothing; whether that makes the
/// whole run empty is the caller's call.
fn expand_glob(input: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let Some(file_pattern) = input.file_name().and_then(|name| name.to_str()) else {
        return Ok(());
    };

    let parent = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.is_dir() {
        return Ok(());
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(&parent)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if path.is_file() && glob_match(file_pattern, name) && has_audio_extension(&path) {
            found.push(path);
        }
    }

    Ok(())
}

/// Minimal glob matching: `*` matches any run of characters, `?` matches
/// exactly one. No character classes, no `**`.
fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    glob_match_at(&pattern, &name)
}

fn glob_match_at(pattern: &[char], name: &[char]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((&'*', rest)) => {
            // Try every possible span for the `*`, shortest first.
            (0..=name.len()).any(|skip| glob_match_at(rest, &name[skip..]))
        }
        Some((&'?', rest)) => match name.split_first() {
            Some((_, name_rest)) => glob_match_at(rest, name_rest),
            None => false,
        },
        Some((ch, rest)) => match name.split_first() {
            Some((name_ch, name_rest)) => ch == name_ch && glob_match_at(rest, name_rest),
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, b"")?;
        Ok(())
    }

    #[test]
    fn glob_match_basics() {
        assert!(glob_match("*.m4a", "meeting.m4a"));
        assert!(glob_match("take?.wav", "take1.wav"));
        assert!(glob_match("*", "anything.mp3"));
        assert!(!glob_match("*.m4a", "meeting.mp3"));
        assert!(!glob_match("take?.wav", "take12.wav"));
    }

    #[test]
    fn collects_explicit_files_with_known_extensions() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let audio = dir.path().join("a.mp3");
        let other = dir.path().join("notes.txt");
        touch(&audio)?;
        touch(&other)?;

        let files = collect_audio_files(&[audio.clone(), other])?;
        assert_eq!(files, vec![audio]);
        Ok(())
    }

    #[test]
    fn walks_directories_recursively_and_sorted() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub)?;
        touch(&dir.path().join("b.wav"))?;
        touch(&dir.path().join("a.wav"))?;
        touch(&sub.join("c.m4a"))?;
        touch(&dir.path().join("skip.txt"))?;

        let files = collect_audio_files(&[dir.path().to_path_buf()])?;
        assert_eq!(
            files,
            vec![
                dir.path().join("a.wav"),
                dir.path().join("b.wav"),
                sub.join("c.m4a"),
            ]
        );
        Ok(())
    }

    #[test]
    fn expands_glob_patterns_in_parent_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        touch(&dir.path().join("ep1.m4a"))?;
        touch(&dir.path().join("ep2.m4a"))?;
        touch(&dir.path().join("cover.png"))?;

        let pattern = dir.path().join("ep*.m4a");
        let files = collect_audio_files(&[pattern])?;
        assert_eq!(
            files,
            vec![dir.path().join("ep1.m4a"), dir.path().join("ep2.m4a")]
        );
        Ok(())
    }

    #[test]
    fn deduplicates_across_arguments() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let audio = dir.path().join("a.flac");
        touch(&audio)?;

        let files = collect_audio_files(&[audio.clone(), dir.path().to_path_buf()])?;
        assert_eq!(files, vec![audio]);
        Ok(())
    }

    #[test]
    fn unmatched_pattern_is_empty_not_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let files = collect_audio_files(&[dir.path().join("*.ogg")])?;
        assert!(files.is_empty());
        Ok(())
    }
}
