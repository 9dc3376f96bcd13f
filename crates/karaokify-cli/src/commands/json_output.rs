//! JSON output types for machine-readable CLI output.
//!
//! Printed by the `--json` flag instead of the colored status lines.

use karaokify_core::{KaraokeError, ProcessResult, SampleFormat};
use serde::{Deserialize, Serialize};

/// Error codes for CLI-level failures.
///
/// Library failures pass through their `KARAOKE_XXX` code.
pub mod error_codes {
    /// No input file was given
    pub const MISSING_INPUT: &str = "CLI_001";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "KARAOKE_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Creates a new JSON error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&KaraokeError> for JsonError {
    fn from(err: &KaraokeError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// Details of a written output file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputFile {
    /// Path of the written file
    pub path: String,
    /// Output format identifier
    pub format: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample of the mono PCM handed to the encoder
    pub bits_per_sample: u16,
    /// Whether the mono PCM was floating point
    pub float: bool,
    /// Number of frames
    pub frames: usize,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// BLAKE3 hash of the mono PCM data
    pub pcm_hash: String,
}

impl From<&ProcessResult> for OutputFile {
    fn from(result: &ProcessResult) -> Self {
        Self {
            path: result.output_path.display().to_string(),
            format: result.format.clone(),
            sample_rate: result.sample_rate,
            bits_per_sample: result.sample_format.bits_per_sample(),
            float: matches!(result.sample_format, SampleFormat::Float),
            frames: result.frames,
            duration_seconds: result.duration_seconds(),
            pcm_hash: result.pcm_hash.clone(),
        }
    }
}

/// Top-level JSON document for a conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessOutput {
    /// Whether the conversion succeeded
    pub success: bool,
    /// Input path as given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Written file, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFile>,
    /// Errors, on failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
    /// Wall-clock time in milliseconds
    pub duration_ms: u64,
}

impl ProcessOutput {
    /// Creates a successful output.
    pub fn success(input: &str, output: OutputFile, duration_ms: u64) -> Self {
        Self {
            success: true,
            input: Some(input.to_string()),
            output: Some(output),
            errors: Vec::new(),
            duration_ms,
        }
    }

    /// Creates a failed output.
    pub fn failure(input: Option<&str>, errors: Vec<JsonError>, duration_ms: u64) -> Self {
        Self {
            success: false,
            input: input.map(str::to_string),
            output: None,
            errors,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_failure_serialization_skips_output() {
        let err = KaraokeError::InvalidChannelCount { channels: 1 };
        let output = ProcessOutput::failure(Some("mono.wav"), vec![JsonError::from(&err)], 3);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["input"], "mono.wav");
        assert_eq!(json["errors"][0]["code"], "KARAOKE_001");
        assert!(json.get("output").is_none());
    }

    #[test]
    fn test_success_serialization() {
        let result = ProcessResult {
            output_path: PathBuf::from("song_karaoked.mp3"),
            format: "mp3".to_string(),
            sample_rate: 44100,
            sample_format: SampleFormat::Int { bits: 16 },
            frames: 44100,
            pcm_hash: "abc".to_string(),
        };
        let output = ProcessOutput::success("song.mp3", OutputFile::from(&result), 12);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["output"]["path"], "song_karaoked.mp3");
        assert_eq!(json["output"]["bits_per_sample"], 16);
        assert_eq!(json["output"]["float"], false);
        assert_eq!(json["output"]["duration_seconds"], 1.0);
        assert!(json.get("errors").is_none());
    }
}
