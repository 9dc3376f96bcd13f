//! Phase-cancellation transform.
//!
//! Inverts the left channel of a stereo buffer, recombines it with the
//! untouched right channel and downmixes the result to mono. Content that is
//! identical in both channels (center-panned, usually the lead vocal) cancels
//! out; everything else survives at half amplitude.
//!
//! The transform is pure: no I/O, no logging, no global state.
//!
//! # Numeric semantics
//!
//! - Integer inversion saturates: `-MIN` becomes `MAX` for the bit depth
//!   (at 16 bits, `-32768` inverts to `32767`).
//! - Integer averages round half to even on the exact sum, so long signals
//!   pick up no DC offset from rounding.
//! - Float averages are `(a + b) * 0.5`.

use crate::buffer::{int_range, AudioBuffer, PcmData};
use crate::error::{KaraokeError, KaraokeResult};


/// Runs the full transform: invert left, recombine, downmix to mono.
///
/// # Errors
/// Returns [`KaraokeError::InvalidChannelCount`] unless the input has exactly
/// two channels. No output is produced in that case.
pub fn transform(stereo: &AudioBuffer) -> KaraokeResult<AudioBuffer> {
    let recombined = invert_left(stereo)?;
    downmix_to_mono(&recombined)
}

/// Returns a new stereo buffer whose channel 0 is the phase-inverted left
/// channel and whose channel 1 is the original right channel.
pub fn invert_left(stereo: &AudioBuffer) -> KaraokeResult<AudioBuffer> {
    let [left, right] = split_stereo(stereo)?;

    let inverted = match left {
        PcmData::Int { bits, samples } => {
            let (min, max) = int_range(bits)?;
            PcmData::Int {
                bits,
                samples: samples
                    .iter()
                    .map(|&s| saturating_negate(s, min, max))
                    .collect(),
            }
        }
        PcmData::Float(samples) => PcmData::Float(samples.iter().map(|&s| -s).collect()),
    };

    AudioBuffer::from_channels(&[inverted, right], stereo.sample_rate())
}

/// Averages the two channels of a stereo buffer into a mono buffer with the
/// same frame count, sample rate and sample format.
pub fn downmix_to_mono(stereo: &AudioBuffer) -> KaraokeResult<AudioBuffer> {
    ensure_stereo(stereo)?;

    let mono = match stereo.data() {
        PcmData::Int { bits, samples } => PcmData::Int {
            bits: *bits,
            samples: samples
                .chunks_exact(2)
                .map(|frame| average_samples(frame[0], frame[1]))
                .collect(),
        },
        PcmData::Float(samples) => PcmData::Float(
            samples
                .chunks_exact(2)
                .map(|frame| (frame[0] + frame[1]) * 0.5)
                .collect(),
        ),
    };

    AudioBuffer::new(mono, 1, stereo.sample_rate())
}

/// Negates an integer sample, saturating at the bit depth's maximum.
///
/// # Errors
/// Returns [`KaraokeError::UnsupportedFormat`] for a bit depth other than
/// 8, 16, 24 or 32.
pub fn invert_sample(sample: i32, bits: u16) -> KaraokeResult<i32> {
    let (min, max) = int_range(bits)?;
    Ok(saturating_negate(sample, min, max))
}

fn saturating_negate(sample: i32, min: i32, max: i32) -> i32 {
    (-i64::from(sample)).clamp(i64::from(min), i64::from(max)) as i32
}

/// Average of two integer samples, rounding half to even.
///
/// The result always lies between `a` and `b`, so it fits any bit depth the
/// inputs fit.
pub fn average_samples(a: i32, b: i32) -> i32 {
    let sum = i64::from(a) + i64::from(b);
    let floor = sum.div_euclid(2);
    let avg = if sum.rem_euclid(2) == 1 && floor.rem_euclid(2) == 1 {
        floor + 1
    } else {
        floor
    };
    avg as i32
}

fn ensure_stereo(buffer: &AudioBuffer) -> KaraokeResult<()> {
    if buffer.is_stereo() {
        Ok(())
    } else {
        Err(KaraokeError::InvalidChannelCount {
            channels: buffer.channels(),
        })
    }
}

fn split_stereo(buffer: &AudioBuffer) -> KaraokeResult<[PcmData; 2]> {
    ensure_stereo(buffer)?;
    buffer
        .split_channels()
        .try_into()
        .map_err(|_| KaraokeError::InvalidChannelCount {
            channels: buffer.channels(),
        })
}
