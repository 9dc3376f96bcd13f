//! Decode and encode boundary.
//!
//! WAV is handled natively; every other container goes through ffmpeg via
//! a temporary WAV file.

use std::path::Path;

use crate::buffer::AudioBuffer;
use crate::error::{KaraokeError, KaraokeResult};
use crate::ffmpeg::{Ffmpeg, FfmpegConfig};
use crate::wav;

/// Returns true if the path has a `.wav` extension (any case).
pub fn is_wav_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

/// Decodes an audio file into a buffer.
///
/// WAV files are read directly. If that fails (for example a compressed WAV
/// codec) and ffmpeg is available, ffmpeg is tried instead; otherwise the
/// original error is returned.
///
/// # Errors
/// [`KaraokeError::InputNotFound`] if `input` does not exist,
/// [`KaraokeError::FfmpegNotFound`] for non-WAV input without ffmpeg, or any
/// decoding error.
pub fn decode(input: &Path, config: &FfmpegConfig) -> KaraokeResult<AudioBuffer> {
    if !input.is_file() {
        return Err(KaraokeError::input_not_found(input));
    }

    if !is_wav_path(input) {
        return decode_with_ffmpeg(&Ffmpeg::locate(config.clone())?, input);
    }

    match wav::read_wav(input) {
        Ok(buffer) => Ok(buffer),
        Err(native_err) => match Ffmpeg::locate(config.clone()) {
            Ok(ffmpeg) => decode_with_ffmpeg(&ffmpeg, input),
            Err(_) => Err(native_err),
        },
    }
}

/// Encodes a buffer to `output` in `format` (a normalized extension such as
/// `wav` or `mp3`).
pub fn encode(
    buffer: &AudioBuffer,
    output: &Path,
    format: &str,
    config: &FfmpegConfig,
) -> KaraokeResult<()> {
    if format == "wav" {
        return wav::write_wav_file(output, buffer);
    }

    let ffmpeg = Ffmpeg::locate(config.clone())?;
    let temp_dir = tempfile::tempdir()?;
    let wav_path = temp_dir.path().join("mono.wav");
    wav::write_wav_file(&wav_path, buffer)?;
    ffmpeg.encode_from_wav(&wav_path, output, format)
}

fn decode_with_ffmpeg(ffmpeg: &Ffmpeg, input: &Path) -> KaraokeResult<AudioBuffer> {
    let temp_dir = tempfile::tempdir()?;
    let wav_path = temp_dir.path().join("decoded.wav");
    ffmpeg.decode_to_wav(input, &wav_path)?;
    wav::read_wav(&wav_path)
}
