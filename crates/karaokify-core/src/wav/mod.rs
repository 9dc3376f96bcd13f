//! Native WAV decoding and encoding.
//!
//! WAV files are read and written with `hound`, preserving bit depth and
//! sample format. Other containers go through [`crate::ffmpeg`]. The PCM
//! hash of a buffer is a stable fingerprint of its sample data, independent
//! of the container header.

mod pcm;
mod reader;
mod writer;


// Re-export public API
pub use pcm::{compute_pcm_hash, pcm_bytes};
pub use reader::{read_wav, read_wav_from_bytes};
pub use writer::{wav_spec, write_wav, write_wav_file, write_wav_to_vec};
