//! Karaokify Core
//!
//! Turns a stereo recording into a "karaoke" mono track by phase
//! cancellation: the left channel is inverted, recombined with the right
//! channel and the pair is averaged down to mono. Anything mixed identically
//! into both channels (typically the lead vocal) cancels; content panned
//! away from the center survives.
//!
//! # Overview
//!
//! ```text
//! decode (wav | ffmpeg) -> check 2 channels -> invert left -> downmix -> encode (wav | ffmpeg)
//! ```
//!
//! Only the transform carries signal-processing logic. It is a pure
//! function over [`AudioBuffer`]s with explicit integer semantics:
//! saturating inversion and round-half-to-even averaging.
//!
//! # Example
//!
//! ```ignore
//! use karaokify_core::{process, ProcessOptions};
//! use std::path::Path;
//!
//! let options = ProcessOptions::default().format("wav");
//! let result = process(Path::new("InputSong.wav"), &options)?;
//! println!("Wrote {}", result.output_path.display());
//! ```
//!
//! # External Tools
//!
//! WAV is read and written natively. Every other container needs `ffmpeg`,
//! searched for in:
//!
//! 1. [`FfmpegConfig::ffmpeg_path`]
//! 2. `FFMPEG_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations (platform-specific)
//!
//! # Crate Structure
//!
//! - [`buffer`] - PCM buffer model
//! - [`transform`] - Phase-cancellation transform
//! - [`wav`] - Native WAV reader/writer and PCM hashing
//! - [`ffmpeg`] - ffmpeg subprocess management
//! - [`codec`] - Decode/encode boundary
//! - [`output`] - Output file naming
//! - [`pipeline`] - End-to-end conversion
//! - [`error`] - Error types

pub mod buffer;
pub mod codec;
pub mod error;
pub mod ffmpeg;
pub mod output;
pub mod pipeline;
pub mod transform;
pub mod wav;

// Re-export main types at crate root
pub use buffer::{AudioBuffer, PcmData, SampleFormat};
pub use error::{KaraokeError, KaraokeResult};
pub use ffmpeg::{Ffmpeg, FfmpegConfig};
pub use pipeline::{process, ProcessOptions, ProcessResult};
pub use transform::transform;
