//! Decode, transform, encode.

use std::path::{Path, PathBuf};

use crate::buffer::SampleFormat;
use crate::codec;
use crate::error::KaraokeResult;
use crate::ffmpeg::FfmpegConfig;
use crate::output::{normalize_format, resolve_output_path, DEFAULT_FORMAT, DEFAULT_SUFFIX};
use crate::transform::transform;
use crate::wav::compute_pcm_hash;

/// Options for a single karaoke conversion.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Output file name; the format extension is appended when missing.
    /// Defaults to `<input-stem><suffix>` next to the input.
    pub output: Option<PathBuf>,
    /// Output format identifier (file extension, e.g. `mp3`, `wav`).
    pub format: String,
    /// Suffix for the default output name.
    pub suffix: String,
    /// ffmpeg settings for non-WAV formats.
    pub ffmpeg: FfmpegConfig,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            output: None,
            format: DEFAULT_FORMAT.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            ffmpeg: FfmpegConfig::default(),
        }
    }
}

impl ProcessOptions {
    /// Sets the output file name.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the default output name suffix.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the ffmpeg configuration.
    pub fn ffmpeg(mut self, ffmpeg: FfmpegConfig) -> Self {
        self.ffmpeg = ffmpeg;
        self
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Path of the written file.
    pub output_path: PathBuf,
    /// Normalized output format.
    pub format: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Sample format of the mono data handed to the encoder.
    pub sample_format: SampleFormat,
    /// Number of frames in the output.
    pub frames: usize,
    /// BLAKE3 hash of the mono PCM data.
    pub pcm_hash: String,
}

impl ProcessResult {
    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }
}

/// Converts `input` to a karaoke mono track.
///
/// Nothing is written unless decoding and the transform both succeed; a
/// non-stereo input yields [`crate::KaraokeError::InvalidChannelCount`].
pub fn process(input: &Path, options: &ProcessOptions) -> KaraokeResult<ProcessResult> {
    let format = normalize_format(&options.format)?;

    let stereo = codec::decode(input, &options.ffmpeg)?;
    let mono = transform(&stereo)?;

    let output_path =
        resolve_output_path(input, options.output.as_deref(), &format, &options.suffix);
    codec::encode(&mono, &output_path, &format, &options.ffmpeg)?;

    Ok(ProcessResult {
        output_path,
        format,
        sample_rate: mono.sample_rate(),
        sample_format: mono.format(),
        frames: mono.frames(),
        pcm_hash: compute_pcm_hash(&mono),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = ProcessOptions::default();
        assert!(options.output.is_none());
        assert_eq!(options.format, "mp3");
        assert_eq!(options.suffix, "_karaoked");
    }

    #[test]
    fn test_options_builder() {
        let options = ProcessOptions::default()
            .output("OutputSong")
            .format("wav")
            .suffix("_novocals")
            .ffmpeg(FfmpegConfig::default().timeout_secs(10));
        assert_eq!(options.output, Some(PathBuf::from("OutputSong")));
        assert_eq!(options.format, "wav");
        assert_eq!(options.suffix, "_novocals");
        assert_eq!(options.ffmpeg.timeout.as_secs(), 10);
    }

    #[test]
    fn test_empty_format_rejected_before_decoding() {
        let options = ProcessOptions::default().format("  ");
        let err = process(Path::new("does-not-matter.mp3"), &options).unwrap_err();
        assert!(matches!(err, crate::KaraokeError::EmptyFormat));
    }

    #[test]
    fn test_duration_seconds() {
        let result = ProcessResult {
            output_path: PathBuf::from("x.wav"),
            format: "wav".to_string(),
            sample_rate: 8000,
            sample_format: SampleFormat::Int { bits: 16 },
            frames: 4000,
            pcm_hash: String::new(),
        };
        assert!((result.duration_seconds() - 0.5).abs() < 1e-12);
    }
}
