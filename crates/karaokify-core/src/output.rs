//! Output file naming.
//!
//! The default output is the input path with its extension replaced by
//! `_karaoked`; the target format's extension is appended unless the name
//! already carries it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{KaraokeError, KaraokeResult};

/// Output format used when none is requested.
pub const DEFAULT_FORMAT: &str = "mp3";

/// Suffix appended to the input stem to form the default output name.
pub const DEFAULT_SUFFIX: &str = "_karaoked";

/// Normalizes a format identifier: trims whitespace, drops a leading dot and
/// lowercases it (`" .WAV "` becomes `"wav"`).
pub fn normalize_format(format: &str) -> KaraokeResult<String> {
    let format = format.trim().trim_start_matches('.').to_ascii_lowercase();
    if format.is_empty() {
        return Err(KaraokeError::EmptyFormat);
    }
    Ok(format)
}

/// Default output base name for `input`: same directory, extension removed,
/// `suffix` appended (`music/song.mp3` becomes `music/song_karaoked`).
pub fn default_output_base(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    input.with_file_name(name)
}

/// Appends `.<format>` to `name` unless it already ends with it.
///
/// The comparison ignores ASCII case, so `OUT.WAV` with `wav` is left alone.
/// Applying it twice gives the same result as applying it once.
pub fn ensure_format_suffix(name: &Path, format: &str) -> PathBuf {
    let extension = format!(".{}", format.to_ascii_lowercase());
    if name
        .to_string_lossy()
        .to_ascii_lowercase()
        .ends_with(&extension)
    {
        return name.to_path_buf();
    }

    let mut with_suffix = name.as_os_str().to_os_string();
    with_suffix.push(&extension);
    PathBuf::from(with_suffix)
}

/// Resolves the final output path from the input path, an optional
/// caller-supplied name, the normalized format and the default suffix.
pub fn resolve_output_path(
    input: &Path,
    output: Option<&Path>,
    format: &str,
    suffix: &str,
) -> PathBuf {
    let base = match output {
        Some(name) => name.to_path_buf(),
        None => default_output_base(input, suffix),
    };
    ensure_format_suffix(&base, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_format() {
        assert_eq!(normalize_format("mp3").unwrap(), "mp3");
        assert_eq!(normalize_format(" .WAV ").unwrap(), "wav");
        assert_eq!(normalize_format("Flac").unwrap(), "flac");
        assert!(matches!(normalize_format(""), Err(KaraokeError::EmptyFormat)));
        assert!(matches!(normalize_format(" . "), Err(KaraokeError::EmptyFormat)));
    }

    #[test]
    fn test_default_output_base() {
        assert_eq!(
            default_output_base(Path::new("InputSong.mp3"), DEFAULT_SUFFIX),
            PathBuf::from("InputSong_karaoked")
        );
        assert_eq!(
            default_output_base(Path::new("music/live.set.flac"), DEFAULT_SUFFIX),
            PathBuf::from("music/live.set_karaoked")
        );
        assert_eq!(
            default_output_base(Path::new("noext"), "_x"),
            PathBuf::from("noext_x")
        );
    }

    #[test]
    fn test_suffix_appended_when_missing() {
        assert_eq!(
            ensure_format_suffix(Path::new("OutputSong"), "wav"),
            PathBuf::from("OutputSong.wav")
        );
        assert_eq!(
            ensure_format_suffix(Path::new("out.mp3"), "wav"),
            PathBuf::from("out.mp3.wav")
        );
    }

    #[test]
    fn test_suffix_not_duplicated() {
        assert_eq!(
            ensure_format_suffix(Path::new("out.wav"), "wav"),
            PathBuf::from("out.wav")
        );
        assert_eq!(
            ensure_format_suffix(Path::new("OUT.WAV"), "wav"),
            PathBuf::from("OUT.WAV")
        );
    }

    #[test]
    fn test_suffix_idempotent() {
        for name in ["a", "a.wav", "dir/b.ogg", "c.WAV"] {
            let once = ensure_format_suffix(Path::new(name), "wav");
            let twice = ensure_format_suffix(&once, "wav");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(
            resolve_output_path(Path::new("InputSong.mp3"), None, "mp3", DEFAULT_SUFFIX),
            PathBuf::from("InputSong_karaoked.mp3")
        );
        assert_eq!(
            resolve_output_path(
                Path::new("InputSong.mp3"),
                Some(Path::new("OutputSong")),
                "wav",
                DEFAULT_SUFFIX
            ),
            PathBuf::from("OutputSong.wav")
        );
    }
}
