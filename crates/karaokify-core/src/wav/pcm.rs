//! PCM serialization and hashing utilities.

use crate::buffer::{AudioBuffer, PcmData};

/// Serializes sample data to little-endian bytes at its native width.
///
/// 8-bit samples take one byte, 24-bit samples three, float samples four.
pub fn pcm_bytes(data: &PcmData) -> Vec<u8> {
    match data {
        PcmData::Int { bits, samples } => {
            let width = (*bits / 8) as usize;
            let mut bytes = Vec::with_capacity(samples.len() * width);
            for &sample in samples {
                bytes.extend_from_slice(&sample.to_le_bytes()[..width]);
            }
            bytes
        }
        PcmData::Float(samples) => samples.iter().flat_map(|s| s.to_le_bytes()).collect(),
    }
}

/// Computes the BLAKE3 hash of a buffer's PCM data.
///
/// The hash covers samples only, not the container header, so the same
/// audio hashes identically whatever it is written to.
pub fn compute_pcm_hash(buffer: &AudioBuffer) -> String {
    blake3::hash(&pcm_bytes(buffer.data())).to_hex().to_string()
}
