//! WAV encoding of [`AudioBuffer`]s.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use crate::buffer::{AudioBuffer, PcmData, SampleFormat};
use crate::error::KaraokeResult;

/// Returns the `hound` header matching a buffer's layout.
pub fn wav_spec(buffer: &AudioBuffer) -> hound::WavSpec {
    let sample_format = match buffer.format() {
        SampleFormat::Int { .. } => hound::SampleFormat::Int,
        SampleFormat::Float => hound::SampleFormat::Float,
    };

    hound::WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: buffer.format().bits_per_sample(),
        sample_format,
    }
}

/// Writes a complete WAV file to a seekable writer.
pub fn write_wav<W: Write + Seek>(writer: W, buffer: &AudioBuffer) -> KaraokeResult<()> {
    let wav = hound::WavWriter::new(writer, wav_spec(buffer))?;
    write_samples(wav, buffer.data())
}

/// Writes a WAV file to disk, replacing any existing file.
pub fn write_wav_file(path: &Path, buffer: &AudioBuffer) -> KaraokeResult<()> {
    let wav = hound::WavWriter::create(path, wav_spec(buffer))?;
    write_samples(wav, buffer.data())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(buffer: &AudioBuffer) -> KaraokeResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, buffer)?;
    Ok(cursor.into_inner())
}

fn write_samples<W: Write + Seek>(
    mut wav: hound::WavWriter<W>,
    data: &PcmData,
) -> KaraokeResult<()> {
    match data {
        PcmData::Int { samples, .. } => {
            for &sample in samples {
                wav.write_sample(sample)?;
            }
        }
        PcmData::Float(samples) => {
            for &sample in samples {
                wav.write_sample(sample)?;
            }
        }
    }
    wav.finalize()?;
    Ok(())
}
