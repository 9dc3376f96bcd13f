//! WAV decoding into [`AudioBuffer`]s.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::buffer::{AudioBuffer, PcmData, SUPPORTED_INT_BITS};
use crate::error::{KaraokeError, KaraokeResult};

/// Reads a WAV file from disk.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed, or if its sample
/// format is not 8/16/24/32-bit integer or 32-bit float.
pub fn read_wav(path: &Path) -> KaraokeResult<AudioBuffer> {
    let reader = hound::WavReader::open(path)?;
    buffer_from_reader(reader)
}

/// Reads a WAV file from an in-memory byte slice.
pub fn read_wav_from_bytes(bytes: &[u8]) -> KaraokeResult<AudioBuffer> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    buffer_from_reader(reader)
}

fn buffer_from_reader<R: Read>(reader: hound::WavReader<R>) -> KaraokeResult<AudioBuffer> {
    let spec = reader.spec();
    let bits = spec.bits_per_sample;

    let data = match spec.sample_format {
        hound::SampleFormat::Int => {
            if !SUPPORTED_INT_BITS.contains(&bits) {
                return Err(KaraokeError::UnsupportedFormat { bits, float: false });
            }
            let samples = reader
                .into_samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?;
            PcmData::Int { bits, samples }
        }
        hound::SampleFormat::Float => {
            if bits != 32 {
                return Err(KaraokeError::UnsupportedFormat { bits, float: true });
            }
            let samples = reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?;
            PcmData::Float(samples)
        }
    };

    AudioBuffer::new(data, spec.channels, spec.sample_rate)
}
