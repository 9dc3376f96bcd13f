//! Error types for the karaokify core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for karaokify operations.
pub type KaraokeResult<T> = Result<T, KaraokeError>;

/// Errors that can occur while decoding, transforming, or encoding audio.
#[derive(Debug, Error)]
pub enum KaraokeError {
    /// Input does not have exactly two channels.
    #[error("input is not a stereo audio file: expected 2 channels, found {channels}")]
    InvalidChannelCount {
        /// Channel count of the rejected buffer.
        channels: u16,
    },

    /// Input file does not exist.
    #[error("input file not found: {path}")]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// ffmpeg executable not found.
    #[error("ffmpeg not found. Install it from https://ffmpeg.org/download.html, or set the FFMPEG_PATH environment variable")]
    FfmpegNotFound,

    /// Failed to spawn the ffmpeg process.
    #[error("failed to spawn ffmpeg: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// ffmpeg did not finish in time.
    #[error("ffmpeg timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// ffmpeg exited with a non-zero status.
    #[error("ffmpeg exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// WAV decoding or encoding failed.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Sample format the buffer model cannot represent.
    #[error("unsupported sample format: {bits} bits per sample (float: {float})")]
    UnsupportedFormat {
        /// Bits per sample.
        bits: u16,
        /// Whether the samples are floating point.
        float: bool,
    },

    /// Integer sample outside the range of its bit depth.
    #[error("sample value {value} does not fit in {bits} bits")]
    SampleOutOfRange { value: i32, bits: u16 },

    /// Interleaved sample count is not a multiple of the channel count.
    #[error("{samples} samples cannot be split evenly into {channels} channels")]
    MisalignedSamples { samples: usize, channels: u16 },

    /// Output format identifier is empty.
    #[error("output format must not be empty")]
    EmptyFormat,

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KaraokeError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new input not found error.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Returns true for per-invocation failures that do not have to abort
    /// the process.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, KaraokeError::InvalidChannelCount { .. })
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            KaraokeError::InvalidChannelCount { .. } => "KARAOKE_001",
            KaraokeError::InputNotFound { .. } => "KARAOKE_002",
            KaraokeError::FfmpegNotFound => "KARAOKE_003",
            KaraokeError::SpawnFailed(_) => "KARAOKE_004",
            KaraokeError::Timeout { .. } => "KARAOKE_005",
            KaraokeError::ProcessFailed { .. } => "KARAOKE_006",
            KaraokeError::Wav(_) => "KARAOKE_007",
            KaraokeError::UnsupportedFormat { .. } => "KARAOKE_008",
            KaraokeError::SampleOutOfRange { .. } => "KARAOKE_009",
            KaraokeError::MisalignedSamples { .. } => "KARAOKE_010",
            KaraokeError::EmptyFormat => "KARAOKE_011",
            KaraokeError::Io(_) => "KARAOKE_012",
        }
    }
}
